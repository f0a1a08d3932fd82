use crate::foundation::core::{GroupId, InstanceId};
use crate::params::blend::BlendBlob;
use crate::params::block::ParamsBlob;

/// One recorded edit of a module instance.
///
/// The list is append-only from the core's perspective; the only mutation
/// ever applied to existing entries is the `multi_priority` renumbering that
/// keeps replay consistent with duplicate/delete/reorder (see the session
/// edit operations).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    /// Instance the edit applied to.
    pub instance: InstanceId,
    /// Instance group the instance belongs to.
    pub group: GroupId,
    /// Operation key, for replay against a future catalog.
    pub op: String,
    /// Ordering key of the instance at (or after renumbering, consistent
    /// with) replay time.
    pub multi_priority: i32,
    /// Versioned snapshot of the live parameters.
    pub params: ParamsBlob,
    /// Versioned snapshot of the blend record.
    pub blend: BlendBlob,
    /// Whether the instance was enabled.
    pub enabled: bool,
}
