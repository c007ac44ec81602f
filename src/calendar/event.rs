use serde::{Deserialize, Deserializer, Serialize};

/// Note and highlight attached to a single date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub text: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
}

impl EventRecord {
    pub fn new(text: impl Into<String>, color: Option<String>) -> Self {
        Self {
            text: text.into(),
            color: color.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.color.is_none()
    }

    /// First line of the note, for one-row listings.
    pub fn summary(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|c| !c.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_color_reads_as_none() {
        let record: EventRecord = serde_json::from_str(r#"{"text":"hi","color":""}"#).unwrap();
        assert_eq!(record, EventRecord::new("hi", None));

        let record: EventRecord = serde_json::from_str(r#"{"text":"hi","color":null}"#).unwrap();
        assert_eq!(record.color, None);

        let record: EventRecord = serde_json::from_str(r#"{"text":""}"#).unwrap();
        assert!(record.is_blank());
    }

    #[test]
    fn absent_color_is_not_written() {
        let json = serde_json::to_string(&EventRecord::new("dentist", None)).unwrap();
        assert_eq!(json, r#"{"text":"dentist"}"#);

        let json = serde_json::to_string(&EventRecord::new("", Some("#ff0000".into()))).unwrap();
        assert_eq!(json, r##"{"text":"","color":"#ff0000"}"##);
    }

    #[test]
    fn summary_takes_first_line() {
        assert_eq!(EventRecord::new("a\nb", None).summary(), "a");
        assert_eq!(EventRecord::default().summary(), "");
    }
}
