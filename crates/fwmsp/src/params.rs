//! Tool parameter structs.
//!
//! Doc comments on fields become the parameter descriptions surfaced to
//! MCP clients, so they are written for the calling model, not for us.

use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct GroupParams {
    /// Optional MSP group id to scope the request to.
    pub group: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct DeviceParams {
    /// Restrict to devices managed by this box (global id).
    pub box_id: Option<String>,
    /// Optional MSP group id to scope the request to.
    pub group: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListParams {
    /// Search query, e.g. `status:active box.name:"Office"`.
    pub query: Option<String>,
    /// Field to group results by.
    pub group_by: Option<String>,
    /// Sort order, e.g. `ts:desc`.
    pub sort_by: Option<String>,
    /// Maximum number of results to return.
    pub limit: Option<u32>,
    /// Continuation cursor from a previous page.
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AlarmParams {
    /// Global id of the box that raised the alarm.
    pub gid: String,
    /// Alarm id, unique within the box.
    pub aid: u64,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct RuleQueryParams {
    /// Search query to filter rules.
    pub query: Option<String>,
    /// Maximum number of rules to return.
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RuleIdParams {
    /// Id of the rule.
    pub id: String,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct RuleBodyParams {
    /// Human-readable rule name.
    pub name: Option<String>,
    /// `allow`, `block`, or `time_limit`.
    pub action: Option<String>,
    /// Traffic direction: `inbound`, `outbound`, or `bidirection`.
    pub direction: Option<String>,
    /// Protocol to match, e.g. `tcp` or `udp`.
    pub protocol: Option<String>,
    /// Target type, e.g. `domain`, `ip`, `category`.
    pub target_type: Option<String>,
    /// Target value, e.g. `example.com`.
    pub target_value: Option<String>,
    /// Apply to DNS lookups only.
    pub target_dns_only: Option<bool>,
    /// Scope type: `device`, `network`, or `group`.
    pub scope_type: Option<String>,
    /// Scope value, e.g. a device id.
    pub scope_value: Option<String>,
    /// Port or port range the rule applies to.
    pub scope_port: Option<String>,
    /// Schedule duration in seconds.
    pub schedule_duration: Option<u64>,
    /// Cron expression for recurring activation.
    pub schedule_cron_time: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RuleUpdateParams {
    /// Id of the rule to update.
    pub id: String,
    #[serde(flatten)]
    pub body: RuleBodyParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TargetListIdParams {
    /// Id of the target list.
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TargetListCreateParams {
    /// Display name of the list.
    pub name: String,
    /// Target entries: domains, IPs, or CIDR ranges.
    pub targets: Vec<String>,
    /// Owning scope, e.g. `global` or a box gid.
    pub owner: Option<String>,
    /// Category label, e.g. `ad` or `edu`.
    pub category: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TargetListUpdateParams {
    /// Id of the target list to update.
    pub id: String,
    /// New display name.
    pub name: Option<String>,
    /// Replacement target entries.
    pub targets: Option<Vec<String>>,
    /// New owning scope.
    pub owner: Option<String>,
    /// New category label.
    pub category: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct StatsParams {
    /// Optional MSP group id to scope the request to.
    pub group: Option<String>,
    /// Maximum number of ranked entries to return.
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct BoxStatsParams {
    /// Ranking metric: `blocked_flows` (default) or `security_alarms`.
    pub metric: Option<String>,
    /// Optional MSP group id to scope the request to.
    pub group: Option<String>,
    /// Maximum number of ranked entries to return.
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct TrendParams {
    /// Optional MSP group id to scope the request to.
    pub group: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    /// Free-text search query applied to every entity type.
    pub query: String,
    /// Entity types to search: `devices`, `alarms`, `rules`, `flows`,
    /// `target_lists`. Defaults to all of them.
    pub types: Option<Vec<String>>,
    /// Per-entity result limit.
    pub limit: Option<u32>,
    /// Continuation cursor from a previous page.
    pub cursor: Option<String>,
}
