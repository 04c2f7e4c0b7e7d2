use serde::{Deserialize, Serialize};

use crate::view::render::RowAttributes;

/// Values of the three fixture filter controls at one point in time.
///
/// An empty control filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    #[serde(default)]
    pub fase: String,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub equipo: String,
}

impl FilterSnapshot {
    pub fn new(fase: impl Into<String>, estado: impl Into<String>, equipo: impl Into<String>) -> Self {
        Self {
            fase: fase.into(),
            estado: estado.into(),
            equipo: equipo.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fase.is_empty() && self.estado.is_empty() && self.equipo.is_empty()
    }

    pub fn matches(&self, attrs: &RowAttributes) -> bool {
        let fase_ok = self.fase.is_empty() || attrs.fase == self.fase;
        let estado_ok = self.estado.is_empty() || attrs.estado == self.estado;

        let equipo = self.equipo.to_lowercase();
        let equipo_ok = equipo.is_empty()
            || attrs.equipo_local.to_lowercase().contains(&equipo)
            || attrs.equipo_visitante.to_lowercase().contains(&equipo);

        fase_ok && estado_ok && equipo_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(fase: &str, estado: &str, local: &str, visitante: &str) -> RowAttributes {
        RowAttributes {
            fase: fase.to_string(),
            estado: estado.to_string(),
            equipo_local: local.to_string(),
            equipo_visitante: visitante.to_string(),
        }
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let f = FilterSnapshot::default();
        assert!(f.is_empty());
        assert!(f.matches(&attrs("grupos", "programado", "A", "B")));
        assert!(f.matches(&attrs("", "", "", "")));
    }

    #[test]
    fn test_each_predicate_alone() {
        let row = attrs("grupos", "finalizado", "Colegio Norte", "Liceo Sur");

        assert!(FilterSnapshot::new("grupos", "", "").matches(&row));
        assert!(!FilterSnapshot::new("final", "", "").matches(&row));

        assert!(FilterSnapshot::new("", "finalizado", "").matches(&row));
        assert!(!FilterSnapshot::new("", "en_curso", "").matches(&row));

        assert!(FilterSnapshot::new("", "", "NORTE").matches(&row));
        assert!(FilterSnapshot::new("", "", "sur").matches(&row));
        assert!(!FilterSnapshot::new("", "", "este").matches(&row));
    }

    #[test]
    fn test_predicates_are_anded() {
        let row = attrs("grupos", "finalizado", "Norte", "Sur");
        assert!(FilterSnapshot::new("grupos", "finalizado", "nor").matches(&row));
        assert!(!FilterSnapshot::new("grupos", "finalizado", "este").matches(&row));
        assert!(!FilterSnapshot::new("final", "finalizado", "nor").matches(&row));
        assert!(!FilterSnapshot::new("grupos", "programado", "nor").matches(&row));
    }

    #[test]
    fn test_phase_match_is_exact() {
        let row = attrs("Grupos", "programado", "A", "B");
        assert!(!FilterSnapshot::new("grupos", "", "").matches(&row));
    }
}
