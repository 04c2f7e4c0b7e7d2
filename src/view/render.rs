use serde::Serialize;

use crate::models::{Estado, Notification, NotificationLevel, Partido};
use crate::utils::{format_date, format_time};
use crate::view::notify::NotificationCenter;
use crate::view::table::TableRow;

/// Placeholder shown in the score column until a match is finished.
pub const SCORE_PLACEHOLDER: &str = "vs";

pub const FIXTURE_HEADERS: [&str; 7] = [
    "Fecha",
    "Fase",
    "Local",
    "Resultado",
    "Visitante",
    "Estado",
    "Acciones",
];

/// Index of each fixture column, in header order.
pub mod columns {
    pub const FECHA: usize = 0;
    pub const FASE: usize = 1;
    pub const LOCAL: usize = 2;
    pub const RESULTADO: usize = 3;
    pub const VISITANTE: usize = 4;
    pub const ESTADO: usize = 5;
    pub const ACCIONES: usize = 6;
}

/// Queryable attributes every rendered row carries (`data-*` in the page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowAttributes {
    pub fase: String,
    pub estado: String,
    pub equipo_local: String,
    pub equipo_visitante: String,
}

impl RowAttributes {
    pub fn data_attributes(&self) -> [(&'static str, &str); 4] {
        [
            ("data-fase", &self.fase),
            ("data-estado", &self.estado),
            ("data-equipo-local", &self.equipo_local),
            ("data-equipo-visitante", &self.equipo_visitante),
        ]
    }
}

/// Detail-view affordance bound to a single match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailTrigger {
    pub partido_id: String,
}

impl DetailTrigger {
    pub fn activate(&self, notifications: &mut NotificationCenter) -> Notification {
        notifications.push(
            format!("Detalles del partido {}", self.partido_id),
            NotificationLevel::Info,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureRow {
    pub attrs: RowAttributes,
    pub fecha: String,
    pub hora: String,
    pub estado: Estado,
    pub score: Option<(i32, i32)>,
    pub detail: DetailTrigger,
    pub cells: Vec<String>,
    pub visible: bool,
}

impl FixtureRow {
    pub fn score_text(&self) -> String {
        match self.score {
            Some((local, visitante)) => format!("{} - {}", local, visitante),
            None => SCORE_PLACEHOLDER.to_string(),
        }
    }
}

impl TableRow for FixtureRow {
    fn cells(&self) -> &[String] {
        &self.cells
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Build one row for a match and bind its attributes and detail trigger.
pub fn render_row(partido: &Partido) -> FixtureRow {
    let kickoff = partido.kickoff();
    if kickoff.is_none() {
        tracing::warn!("Unparseable fecha '{}' for partido {}", partido.fecha, partido.id);
    }

    let estado = partido.estado();
    let score = (estado == Estado::Finalizado).then(|| {
        (
            partido.goles_local.unwrap_or(0),
            partido.goles_visitante.unwrap_or(0),
        )
    });

    let mut row = FixtureRow {
        attrs: RowAttributes {
            fase: partido.fase.clone(),
            estado: partido.estado.clone(),
            equipo_local: partido.equipo_local.clone(),
            equipo_visitante: partido.equipo_visitante.clone(),
        },
        fecha: format_date(kickoff),
        hora: format_time(kickoff),
        estado,
        score,
        detail: DetailTrigger {
            partido_id: partido.id.clone(),
        },
        cells: Vec::new(),
        visible: true,
    };

    row.cells = vec![
        format!("{} {}", row.fecha, row.hora),
        partido.fase.clone(),
        partido.equipo_local.clone(),
        row.score_text(),
        partido.equipo_visitante.clone(),
        estado.label().to_string(),
        String::new(),
    ];
    row
}

/// Rebuild the whole body: one row per match, in input order.
pub fn render_rows(partidos: &[Partido]) -> Vec<FixtureRow> {
    partidos.iter().map(render_row).collect()
}
