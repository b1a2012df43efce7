/// Deserializes an identifier that may arrive as a JSON string or number,
/// e.g. auto-increment keys, into its string form.
pub mod string_or_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => text,
            RawId::Unsigned(number) => number.to_string(),
            RawId::Signed(number) => number.to_string(),
            RawId::Float(number) => number.to_string(),
        })
    }
}
