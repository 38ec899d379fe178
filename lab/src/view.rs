//! Terminal rendering of the workspace.
//!
//! Everything here is a pure function of store state; nothing is cached.

use crate::advisory::LOADING_MESSAGE;
use crate::catalog::Catalog;
use crate::phase::ProjectPhase;
use crate::project::ProjectData;
use crate::requirement::RequirementStatus;
use crate::store::ProjectStore;

const RULE: &str = "------------------------------------------------------------";

/// Full screen for the store's current phase.
pub fn render(store: &ProjectStore) -> String {
    render_view(
        store.phase(),
        store.data(),
        store.catalog(),
        store.advisory_message(),
        store.is_advisory_loading(),
    )
}

pub fn render_view(
    phase: ProjectPhase,
    data: &ProjectData,
    catalog: &Catalog,
    advisory_message: &str,
    loading: bool,
) -> String {
    let mut out = String::new();
    out.push_str(&render_tabs(phase));
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    let body = match phase {
        ProjectPhase::Requirements => render_requirements(data),
        ProjectPhase::Components => render_components(data, catalog),
        ProjectPhase::Modeling => render_modeling(data),
        ProjectPhase::Programming => render_programming(data),
        ProjectPhase::Report => render_report(data),
    };
    out.push_str(&body);
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&render_tutor(advisory_message, loading));
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&render_footer(phase, data));
    out
}

pub fn render_tabs(active: ProjectPhase) -> String {
    ProjectPhase::ALL
        .iter()
        .map(|p| {
            if *p == active {
                format!("[{}]", p)
            } else {
                format!(" {} ", p)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_requirements(data: &ProjectData) -> String {
    let mut out = String::new();
    let name = if data.project_name().is_empty() {
        "(sin nombre)"
    } else {
        data.project_name()
    };
    out.push_str(&format!("Proyecto: {}\n", name));
    out.push_str("\nAnálisis de Requerimientos\n");

    if data.requirements().is_empty() {
        out.push_str(
            "  No hay requerimientos definidos. Usa `add <functional|economic|safety>` para empezar.\n",
        );
        return out;
    }

    for (position, req) in data.requirements().iter().enumerate() {
        let status = match req.status() {
            RequirementStatus::Pending => "pending",
            RequirementStatus::Defined => "defined",
        };
        let description = if req.description().is_empty() {
            format!("(define el requerimiento {}...)", req.kind())
        } else {
            req.description().to_string()
        };
        out.push_str(&format!(
            "  {:>2}. {:<10} [{}] {}\n",
            position + 1,
            req.kind().as_str().to_uppercase(),
            status,
            description
        ));
    }
    out
}

fn render_components(data: &ProjectData, catalog: &Catalog) -> String {
    let mut out = String::new();
    out.push_str("Selección de Componentes\n");

    for component in catalog.iter() {
        let mark = if data.is_selected(&component.id) {
            "x"
        } else {
            " "
        };
        out.push_str(&format!(
            "  [{}] {:<14} {} ({}) ${:.2}\n",
            mark, component.id, component.name, component.category, component.cost
        ));
        out.push_str(&format!("      {}\n", component.description));
        let specs: Vec<String> = component
            .specifications
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect();
        if !specs.is_empty() {
            out.push_str(&format!("      {}\n", specs.join(" | ")));
        }
    }

    out.push_str(&format!(
        "\nPresupuesto Estimado: ${:.2}\n",
        data.budget_total()
    ));
    out
}

fn render_modeling(data: &ProjectData) -> String {
    let mut out = String::new();
    out.push_str("Modelación y Física\n");
    if data.math_model().is_empty() {
        out.push_str(
            "  Usa `analyze <concepto>` (ej: \"Dinámica de un motor DC\", \"Llenado de tanque con integral\").\n",
        );
    } else {
        out.push_str(data.math_model());
        out.push('\n');
    }
    out
}

fn render_programming(data: &ProjectData) -> String {
    let mut out = String::new();
    out.push_str("Lógica de Control (Arduino) - sketch_mechamaster.ino\n");
    if data.arduino_code().is_empty() {
        out.push_str("// El código generado aparecerá aquí...\n");
    } else {
        out.push_str(data.arduino_code());
        out.push('\n');
    }
    out.push_str(
        "\n* Recuerda validar siempre el código en un simulador como Tinkercad o Wokwi antes de implementarlo en hardware real.\n",
    );
    out
}

/// The design report as plain text.
pub fn render_report(data: &ProjectData) -> String {
    let mut out = String::new();
    let title = if data.project_name().is_empty() {
        "Reporte de Diseño Mecatrónico"
    } else {
        data.project_name()
    };
    out.push_str(title);
    out.push('\n');
    out.push_str("Documento de Integración y Selección de Componentes\n\n");

    out.push_str("1. Análisis de Requerimientos\n");
    for req in data.requirements() {
        let description = if req.description().is_empty() {
            "No definido"
        } else {
            req.description()
        };
        out.push_str(&format!("   [{}] {}\n", req.kind(), description));
    }

    out.push_str("\n2. Lista de Componentes Seleccionados\n");
    for component in data.selected_components() {
        out.push_str(&format!(
            "   {} ({}) ${:.2}\n",
            component.name, component.category, component.cost
        ));
    }

    out.push_str("\n3. Modelo Matemático\n");
    let model_line = if data.math_model().is_empty() {
        "No se ha generado modelo matemático."
    } else {
        "Análisis IA incluido en el reporte final."
    };
    out.push_str(&format!("   {}\n", model_line));
    out
}

fn render_tutor(message: &str, loading: bool) -> String {
    let text = if loading { LOADING_MESSAGE } else { message };
    format!("Tutor de Mecatrónica\n  {}\n", text)
}

fn render_footer(phase: ProjectPhase, data: &ProjectData) -> String {
    let name = if data.project_name().is_empty() {
        "Sin Nombre"
    } else {
        data.project_name()
    };
    format!(
        "PROYECTO: {}    PHASE: {}\n",
        name.to_uppercase(),
        phase.as_str().to_uppercase()
    )
}
