use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the cmdlet catalog returned by `Get-Help`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmdletDescriptor {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Synopsis", default, deserialize_with = "null_as_empty")]
    pub synopsis: String,
}

impl CmdletDescriptor {
    pub fn new(name: &str, synopsis: &str) -> Self {
        Self {
            name: name.to_string(),
            synopsis: synopsis.to_string(),
        }
    }

    /// Identifier under which the cmdlet's proxy is registered:
    /// `Set-AdfsProperties` → `set_adfsproperties`.
    pub fn function_name(&self) -> String {
        normalize_cmdlet_name(&self.name)
    }
}

pub fn normalize_cmdlet_name(name: &str) -> String {
    name.replace('-', "_").to_lowercase()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Documentation for a callable module function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDoc {
    pub name: String,
    pub doc: String,
}

impl FunctionDoc {
    pub fn new(name: &str, doc: &str) -> Self {
        Self {
            name: name.to_string(),
            doc: doc.to_string(),
        }
    }
}
