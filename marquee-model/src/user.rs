use crate::ids::RecordId;

/// Profile returned by `GET /user/info` for the holder of the session token.
///
/// Every field is optional: any 2xx body is a valid profile. Fields not
/// modelled here are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserProfile {
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "_id", skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<RecordId>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub username: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "displayName",
            alias = "name",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub display_name: Option<String>,
    #[cfg(feature = "serde")]
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.username.clone())
            .or_else(|| self.id.as_ref().map(RecordId::to_string))
            .unwrap_or_else(|| "unnamed user".to_string())
    }
}
