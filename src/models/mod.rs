use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partido {
    #[serde(deserialize_with = "id_as_text")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fase: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub estado: String, // "programado", "en_curso", "finalizado"
    pub equipo_local: String,
    pub equipo_visitante: String,
    #[serde(default)]
    pub goles_local: Option<i32>,
    #[serde(default)]
    pub goles_visitante: Option<i32>,
    pub fecha: String,
}

impl Partido {
    pub fn estado(&self) -> Estado {
        Estado::from_raw(&self.estado)
    }

    /// Kickoff as a naive local date-time, if the server string is parseable.
    pub fn kickoff(&self) -> Option<NaiveDateTime> {
        parse_fecha(&self.fecha)
    }
}

/// The upstream serialises ids as numbers, but nothing here does arithmetic on them.
fn id_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Nullable text columns decode to an empty string instead of failing the list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

const FECHA_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn parse_fecha(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    FECHA_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Estado {
    Programado,
    EnCurso,
    Finalizado,
    Desconocido,
}

impl Estado {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "programado" => Estado::Programado,
            "en_curso" => Estado::EnCurso,
            "finalizado" => Estado::Finalizado,
            _ => Estado::Desconocido,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Estado::Programado => "Programado",
            Estado::EnCurso => "En Curso",
            Estado::Finalizado => "Finalizado",
            Estado::Desconocido => "Desconocido",
        }
    }

    /// Bootstrap background class for the status badge.
    pub fn badge_class(self) -> &'static str {
        match self {
            Estado::Programado => "bg-warning",
            Estado::EnCurso => "bg-info",
            Estado::Finalizado => "bg-success",
            Estado::Desconocido => "bg-secondary",
        }
    }

    pub fn icon(self) -> Option<&'static str> {
        match self {
            Estado::Programado => Some("fa-clock"),
            Estado::EnCurso => Some("fa-play"),
            Estado::Finalizado => Some("fa-check"),
            Estado::Desconocido => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Danger,
}

impl NotificationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// API Response types
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}
