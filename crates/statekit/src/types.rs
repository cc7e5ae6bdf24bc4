use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

/// Identifiers of every resource the provisioning scripts have recorded.
///
/// Mirrors the on-disk document exactly: a single JSON object with the keys
/// `instances`, `security_groups`, `key_pairs` and `s3_buckets`, each an
/// array of strings. Missing keys and `null` values decode to empty lists.
/// Order and duplicates are preserved as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResourceState {
    /// EC2 instance IDs
    #[serde(default, deserialize_with = "null_as_empty")]
    pub instances: Vec<String>,

    /// Security group IDs
    #[serde(default, deserialize_with = "null_as_empty")]
    pub security_groups: Vec<String>,

    /// Key pair names
    #[serde(default, deserialize_with = "null_as_empty")]
    pub key_pairs: Vec<String>,

    /// S3 bucket names
    #[serde(default, deserialize_with = "null_as_empty")]
    pub s3_buckets: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResourceState {
    /// Decode a state document.
    ///
    /// The top level must be a JSON object. Any type error inside one of the
    /// four lists rejects the whole document; no partial state is returned.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        let object: Map<String, Value> = serde_json::from_slice(bytes)?;
        serde_json::from_value(Value::Object(object))
    }

    /// True when no resource of any kind is recorded.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Number of recorded identifiers across all kinds.
    pub fn total(&self) -> usize {
        self.instances.len()
            + self.security_groups.len()
            + self.key_pairs.len()
            + self.s3_buckets.len()
    }

    /// Identifiers for one kind of resource.
    pub fn ids(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::Instance => &self.instances,
            ResourceKind::SecurityGroup => &self.security_groups,
            ResourceKind::KeyPair => &self.key_pairs,
            ResourceKind::S3Bucket => &self.s3_buckets,
        }
    }

    /// Every kind with its identifiers, in display order.
    pub fn categories(&self) -> impl Iterator<Item = (ResourceKind, &[String])> {
        ResourceKind::ALL.into_iter().map(|kind| (kind, self.ids(kind)))
    }
}

/// The kinds of resource tracked in the state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Instance,
    SecurityGroup,
    KeyPair,
    S3Bucket,
}

impl ResourceKind {
    /// All kinds in display order
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Instance,
        ResourceKind::SecurityGroup,
        ResourceKind::KeyPair,
        ResourceKind::S3Bucket,
    ];

    /// Human-readable plural label
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Instance => "EC2 Instances",
            ResourceKind::SecurityGroup => "Security Groups",
            ResourceKind::KeyPair => "Key Pairs",
            ResourceKind::S3Bucket => "S3 Buckets",
        }
    }

    /// Key used in the state document
    pub fn json_key(self) -> &'static str {
        match self {
            ResourceKind::Instance => "instances",
            ResourceKind::SecurityGroup => "security_groups",
            ResourceKind::KeyPair => "key_pairs",
            ResourceKind::S3Bucket => "s3_buckets",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_document() {
        let json = br#"{"instances":["i-1"],"security_groups":[],"key_pairs":["kp-1"],"s3_buckets":["b-1","b-2"]}"#;
        let state = ResourceState::from_json(json).unwrap();

        assert_eq!(state.instances, vec!["i-1"]);
        assert!(state.security_groups.is_empty());
        assert_eq!(state.key_pairs, vec!["kp-1"]);
        assert_eq!(state.s3_buckets, vec!["b-1", "b-2"]);
        assert_eq!(state.total(), 4);
    }

    #[test]
    fn test_missing_and_null_keys() {
        let state = ResourceState::from_json(br#"{"instances":null,"key_pairs":["kp-9"]}"#).unwrap();
        assert!(state.instances.is_empty());
        assert!(state.security_groups.is_empty());
        assert_eq!(state.key_pairs, vec!["kp-9"]);
        assert!(state.s3_buckets.is_empty());

        let empty = ResourceState::from_json(b"{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let state =
            ResourceState::from_json(br#"{"s3_buckets":["z","a","z"],"extra":"ignored"}"#).unwrap();
        assert_eq!(state.s3_buckets, vec!["z", "a", "z"]);
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(ResourceState::from_json(b"{not json").is_err());
        assert!(ResourceState::from_json(br#"{"instances":[1,2]}"#).is_err());
        assert!(ResourceState::from_json(b"[]").is_err());
        assert!(ResourceState::from_json(br#"[["i-9"],[],["kp"],[]]"#).is_err());
        assert!(ResourceState::from_json(br#""instances""#).is_err());
    }

    #[test]
    fn test_bad_element_rejects_whole_document() {
        let err = ResourceState::from_json(br#"{"instances":[1],"s3_buckets":["b-1"]}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_categories_order() {
        let state = ResourceState {
            instances: vec!["i-1".to_string()],
            ..Default::default()
        };
        let labels: Vec<_> = state.categories().map(|(k, _)| k.label()).collect();
        assert_eq!(
            labels,
            vec!["EC2 Instances", "Security Groups", "Key Pairs", "S3 Buckets"]
        );

        let (kind, ids) = state.categories().next().unwrap();
        assert_eq!(kind.json_key(), "instances");
        assert_eq!(ids, ["i-1".to_string()]);
    }
}
