//! Wire types for the Firewalla MSP API v2.
//!
//! All types match the JSON responses from `/v2/` endpoints. Field names
//! use camelCase via `#[serde(rename_all = "camelCase")]`. Every field the
//! MSP may omit is `Option` with a serde default, and the main entities
//! carry a `#[serde(flatten)]` catch-all so unmodeled fields survive a
//! round trip through the response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

// ── Pagination ───────────────────────────────────────────────────────

/// Generic list wrapper returned by all list endpoints.
///
/// `next_cursor` is an opaque continuation token; `None` (or absent)
/// means the final page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            count: None,
            next_cursor: None,
        }
    }
}

// ── Boxes ────────────────────────────────────────────────────────────

/// A managed security appliance — from `GET /v2/boxes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxInfo {
    /// Global box id.
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub online: Option<bool>,
    /// Operating mode: `router`, `bridge`, `dhcp`, or `simple`.
    #[serde(default)]
    pub mode: Option<String>,
    /// Firmware version.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub device_count: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Reference to a named entity (box, network, device) embedded in another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

/// A network endpoint observed by a box — from `GET /v2/devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub id: Option<String>,
    /// Owning box id.
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub mac_vendor: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub online: Option<bool>,
    /// Last-active timestamp, Unix seconds.
    #[serde(default)]
    pub last_seen: Option<f64>,
    #[serde(default)]
    pub network: Option<EntityRef>,
    #[serde(default)]
    pub total_download: Option<u64>,
    #[serde(default)]
    pub total_upload: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Device {
    pub fn is_online(&self) -> bool {
        self.online.unwrap_or(false)
    }
}

// ── Alarms ───────────────────────────────────────────────────────────

/// Derived alarm severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Remote endpoint descriptor attached to an alarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmRemote {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Download/upload byte counters attached to alarms and flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(default)]
    pub download: Option<u64>,
    #[serde(default)]
    pub upload: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// A detected security event — from `GET /v2/alarms`.
///
/// Identity is the compound `{gid}/{aid}` pair; `aid` alone is only
/// unique within one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub aid: Option<u64>,
    /// Event timestamp, Unix seconds.
    #[serde(default)]
    pub ts: Option<f64>,
    /// Numeric alarm type code.
    #[serde(rename = "type", default)]
    pub alarm_type: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    /// `active`, `resolved`, or `archived`.
    #[serde(default)]
    pub status: Option<String>,
    /// Explicit severity, if the MSP supplies one.
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub device: Option<EntityRef>,
    #[serde(default)]
    pub remote: Option<AlarmRemote>,
    #[serde(default)]
    pub transfer: Option<Transfer>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Alarm {
    /// Alarm severity, derived from the numeric type code when the MSP
    /// does not supply one: type <= 2 is HIGH, <= 5 is MEDIUM, else LOW.
    pub fn severity(&self) -> Severity {
        if let Some(explicit) = self.severity.as_deref() {
            match explicit.to_ascii_uppercase().as_str() {
                "HIGH" => return Severity::High,
                "MEDIUM" => return Severity::Medium,
                "LOW" => return Severity::Low,
                _ => {}
            }
        }
        match self.alarm_type {
            Some(t) if t <= 2 => Severity::High,
            Some(t) if t <= 5 => Severity::Medium,
            _ => Severity::Low,
        }
    }

    /// Human label for the numeric alarm type code.
    pub fn type_label(&self) -> String {
        match self.alarm_type {
            Some(1) => "Security Activity".into(),
            Some(2) => "Abnormal Upload".into(),
            Some(3) => "Large Bandwidth Usage".into(),
            Some(4) => "Monthly Data Plan".into(),
            Some(5) => "New Device".into(),
            Some(6) => "Device Back Online".into(),
            Some(7) => "Device Offline".into(),
            Some(8) => "Video Activity".into(),
            Some(9) => "Gaming Activity".into(),
            Some(10) => "Adult Content".into(),
            Some(11) => "VPN Activity".into(),
            Some(12) => "Open Port".into(),
            Some(13) => "Weak Password".into(),
            Some(14) => "Internet Connectivity".into(),
            Some(15) => "Large Upload".into(),
            Some(16) => "Abnormal Activity".into(),
            Some(other) => format!("Type {other}"),
            None => "Unknown".into(),
        }
    }
}

// ── Rules ────────────────────────────────────────────────────────────

/// Rule target: what traffic the rule matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTarget {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_only: Option<bool>,
}

/// Rule scope: which devices or networks the rule applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleScope {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scope_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

/// Rule schedule (cron expression plus active duration in seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_time: Option<String>,
}

/// Hit counters for a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleHit {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub last_hit_ts: Option<f64>,
}

/// A traffic policy — from `GET /v2/rules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// `active` or `paused`.
    #[serde(default)]
    pub status: Option<String>,
    /// `allow`, `block`, or `time_limit`.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub target: Option<RuleTarget>,
    #[serde(default)]
    pub scope: Option<RuleScope>,
    #[serde(default)]
    pub schedule: Option<RuleSchedule>,
    #[serde(default)]
    pub hit: Option<RuleHit>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub ts: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Rule {
    /// Display name for the rule. Never empty: when the MSP record has no
    /// name, one is synthesized deterministically from action, direction,
    /// protocol, and target value.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref() {
            if !name.is_empty() {
                return name.to_owned();
            }
        }
        let action = self.action.as_deref().unwrap_or("rule");
        let direction = self.direction.as_deref().unwrap_or("bidirection");
        let protocol = self.protocol.as_deref().unwrap_or("any");
        let target = self
            .target
            .as_ref()
            .and_then(|t| t.value.as_deref())
            .unwrap_or("any");
        format!("{action} {direction} {protocol} traffic: {target}")
    }

    pub fn hit_count(&self) -> u64 {
        self.hit.as_ref().and_then(|h| h.count).unwrap_or(0)
    }
}

/// Create/update body for `POST /v2/rules` and `PUT /v2/rules/{id}`.
///
/// Absent fields are omitted from the JSON body entirely, never sent
/// as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCreateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<RuleTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<RuleScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<RuleSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ── Flows ────────────────────────────────────────────────────────────

/// An observed traffic record — from `GET /v2/flows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    #[serde(default)]
    pub ts: Option<f64>,
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub device: Option<EntityRef>,
    /// `in`, `out`, or `bi`.
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sport: Option<u32>,
    #[serde(default)]
    pub dport: Option<u32>,
    #[serde(default)]
    pub download: Option<u64>,
    #[serde(default)]
    pub upload: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Flow {
    /// Remote identifier for display: domain preferred, then IP.
    pub fn remote_name(&self) -> &str {
        self.domain
            .as_deref()
            .or(self.ip.as_deref())
            .unwrap_or("N/A")
    }
}

// ── Target lists ─────────────────────────────────────────────────────

/// A named collection of block/allow targets — from `GET /v2/target-lists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetList {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_updated: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Create/update body for target lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetListCreateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ── Statistics & trends ──────────────────────────────────────────────

/// Fleet-level counters — from `GET /v2/stats/simple`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleStats {
    #[serde(default)]
    pub online_boxes: Option<u64>,
    #[serde(default)]
    pub offline_boxes: Option<u64>,
    #[serde(default)]
    pub alarms: Option<u64>,
    #[serde(default)]
    pub rules: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One ranked entry from `GET /v2/stats/{type}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    /// Subject of the entry (a box or region descriptor).
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// One point from `GET /v2/trends/{type}`, ordered by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Report types accepted by the typed stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum StatsType {
    TopBoxesByBlockedFlows,
    TopBoxesBySecurityAlarms,
    TopRegionsByBlockedFlows,
}

/// Series types accepted by the trends endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TrendType {
    Flows,
    Alarms,
    Rules,
}

// ── Search ───────────────────────────────────────────────────────────

/// Entity types that support server-side search via the `query` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SearchEntity {
    Devices,
    Alarms,
    Rules,
    Flows,
    TargetLists,
}

impl SearchEntity {
    /// URL path segment for this entity's list endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Self::Devices => "devices",
            Self::Alarms => "alarms",
            Self::Rules => "rules",
            Self::Flows => "flows",
            Self::TargetLists => "target-lists",
        }
    }

    /// The fixed subset searched when the caller does not narrow it.
    pub fn all() -> [Self; 5] {
        [
            Self::Devices,
            Self::Alarms,
            Self::Rules,
            Self::Flows,
            Self::TargetLists,
        ]
    }
}

// ── Query parameters ─────────────────────────────────────────────────

/// Common list-endpoint qualifiers: free-text query, grouping, sorting,
/// page size, and continuation cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub query: Option<String>,
    pub group_by: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl ListQuery {
    /// Render only the present fields as query parameters; absent fields
    /// are omitted entirely rather than sent as null.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref q) = self.query {
            params.push(("query", q.clone()));
        }
        if let Some(ref g) = self.group_by {
            params.push(("groupBy", g.clone()));
        }
        if let Some(ref s) = self.sort_by {
            params.push(("sortBy", s.clone()));
        }
        if let Some(l) = self.limit {
            params.push(("limit", l.to_string()));
        }
        if let Some(ref c) = self.cursor {
            params.push(("cursor", c.clone()));
        }
        params
    }
}
