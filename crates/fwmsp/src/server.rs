//! MCP tool surface over the MSP client.
//!
//! Each tool makes exactly one upstream call (the global search fans out
//! per entity type) and returns a single text content block holding a
//! `firewalla_response` envelope, or a one-sentence confirmation for
//! destructive operations.

use std::str::FromStr;
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use fwmsp_api::{
    Error as ApiError, MspClient,
    types::{
        Device, ListQuery, ListResponse, Rule, RuleCreateUpdate, RuleSchedule, RuleScope,
        RuleTarget, SearchEntity, StatsType, TargetListCreateUpdate, TrendType,
    },
};
use fwmsp_format::{Meta, render_enhanced};

use crate::params::{
    AlarmParams, BoxStatsParams, DeviceParams, GroupParams, ListParams, RuleBodyParams,
    RuleIdParams, RuleQueryParams, RuleUpdateParams, SearchParams, StatsParams,
    TargetListCreateParams, TargetListIdParams, TargetListUpdateParams, TrendParams,
};

const INSTRUCTIONS: &str = "Query and manage a Firewalla MSP deployment: boxes, devices, \
security alarms, network rules, traffic flows, target lists, statistics, and trends. \
Read tools return a firewalla_response XML envelope with an embedded Markdown report \
and the raw upstream data; write tools return the affected resource or a confirmation.";

/// Map an upstream API error onto the MCP error taxonomy. Token,
/// not-found, and validation failures are the caller's fault; anything
/// else is an internal failure.
fn mcp_error(e: &ApiError) -> McpError {
    if e.is_client_fault() {
        McpError::invalid_request(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}

fn to_value<T: Serialize>(v: &T) -> Result<Value, McpError> {
    serde_json::to_value(v).map_err(|e| McpError::internal_error(e.to_string(), None))
}

/// Wrap one entity in the list shape the renderers consume.
fn single(value: Value) -> Value {
    json!({ "results": [value], "count": 1 })
}

fn envelope_result(response_type: &str, data: &Value, meta: &Meta) -> CallToolResult {
    CallToolResult::success(vec![Content::text(render_enhanced(
        response_type,
        data,
        meta,
    ))])
}

fn confirmation(sentence: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(sentence)])
}

/// Metadata map from present key/value pairs only.
fn meta_of(pairs: &[(&str, Option<&str>)]) -> Meta {
    let mut meta = Meta::new();
    for (key, value) in pairs {
        if let Some(v) = value {
            meta.insert((*key).to_owned(), (*v).to_owned());
        }
    }
    meta
}

#[derive(Clone)]
pub struct MspServer {
    client: Arc<MspClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl MspServer {
    pub fn new(client: MspClient) -> Self {
        Self {
            client: Arc::new(client),
            tool_router: Self::tool_router(),
        }
    }

    // ── Boxes & devices ──────────────────────────────────────────────

    #[tool(description = "List all Firewalla boxes in the MSP deployment")]
    async fn get_boxes(
        &self,
        Parameters(p): Parameters<GroupParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = self
            .client
            .list_boxes(p.group.as_deref())
            .await
            .map_err(|e| mcp_error(&e))?;
        let meta = meta_of(&[("group", p.group.as_deref())]);
        Ok(envelope_result("boxes", &to_value(&page)?, &meta))
    }

    #[tool(description = "List devices known to the deployment, optionally scoped to one box")]
    async fn get_devices(
        &self,
        Parameters(p): Parameters<DeviceParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = self
            .client
            .list_devices(p.box_id.as_deref(), p.group.as_deref())
            .await
            .map_err(|e| mcp_error(&e))?;
        let meta = meta_of(&[("box_id", p.box_id.as_deref()), ("group", p.group.as_deref())]);
        Ok(envelope_result("devices", &to_value(&page)?, &meta))
    }

    #[tool(description = "List devices that are currently offline")]
    async fn get_offline_devices(
        &self,
        Parameters(p): Parameters<DeviceParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut page = self
            .client
            .list_devices(p.box_id.as_deref(), p.group.as_deref())
            .await
            .map_err(|e| mcp_error(&e))?;
        retain_offline(&mut page);
        let meta = meta_of(&[("filter", Some("offline"))]);
        Ok(envelope_result("devices", &to_value(&page)?, &meta))
    }

    // ── Alarms ───────────────────────────────────────────────────────

    #[tool(description = "List security alarms; defaults to active alarms when no query is given")]
    async fn get_active_alarms(
        &self,
        Parameters(p): Parameters<ListParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = p.query.unwrap_or_else(|| "status:active".to_owned());
        let list_query = ListQuery {
            query: Some(query.clone()),
            group_by: p.group_by,
            sort_by: p.sort_by,
            limit: p.limit,
            cursor: p.cursor,
        };
        let page = self
            .client
            .list_alarms(&list_query)
            .await
            .map_err(|e| mcp_error(&e))?;
        let meta = meta_of(&[("query", Some(query.as_str()))]);
        Ok(envelope_result("alarms", &to_value(&page)?, &meta))
    }

    #[tool(description = "Fetch one alarm by box gid and alarm id")]
    async fn get_specific_alarm(
        &self,
        Parameters(p): Parameters<AlarmParams>,
    ) -> Result<CallToolResult, McpError> {
        let alarm = self
            .client
            .get_alarm(&p.gid, p.aid)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(envelope_result(
            "alarms",
            &single(to_value(&alarm)?),
            &Meta::new(),
        ))
    }

    #[tool(description = "Delete one alarm by box gid and alarm id")]
    async fn delete_alarm(
        &self,
        Parameters(p): Parameters<AlarmParams>,
    ) -> Result<CallToolResult, McpError> {
        self.client
            .delete_alarm(&p.gid, p.aid)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(confirmation(format!(
            "Alarm {} on box {} deleted.",
            p.aid, p.gid
        )))
    }

    // ── Rules ────────────────────────────────────────────────────────

    #[tool(description = "List network rules, optionally filtered by a search query")]
    async fn get_network_rules(
        &self,
        Parameters(p): Parameters<RuleQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = self
            .client
            .list_rules(p.query.as_deref(), p.limit)
            .await
            .map_err(|e| mcp_error(&e))?;
        let meta = meta_of(&[("query", p.query.as_deref())]);
        Ok(envelope_result("rules", &to_value(&page)?, &meta))
    }

    #[tool(description = "List network rules ranked by hit count, most active first")]
    async fn get_most_active_rules(
        &self,
        Parameters(p): Parameters<RuleQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut page = self
            .client
            .list_rules(p.query.as_deref(), p.limit)
            .await
            .map_err(|e| mcp_error(&e))?;
        sort_by_hits(&mut page.results);
        let meta = meta_of(&[("sort", Some("hits:desc"))]);
        Ok(envelope_result("rules", &to_value(&page)?, &meta))
    }

    #[tool(description = "List network rules ordered by creation time, newest first")]
    async fn get_recent_rules(
        &self,
        Parameters(p): Parameters<RuleQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut page = self
            .client
            .list_rules(p.query.as_deref(), p.limit)
            .await
            .map_err(|e| mcp_error(&e))?;
        sort_by_recency(&mut page.results);
        let meta = meta_of(&[("sort", Some("ts:desc"))]);
        Ok(envelope_result("rules", &to_value(&page)?, &meta))
    }

    #[tool(description = "Create a network rule; requires an action and a target value")]
    async fn create_rule(
        &self,
        Parameters(p): Parameters<RuleBodyParams>,
    ) -> Result<CallToolResult, McpError> {
        if p.action.is_none() {
            return Err(McpError::invalid_params("action is required", None));
        }
        if p.target_value.is_none() {
            return Err(McpError::invalid_params("target_value is required", None));
        }
        let body = rule_body(p);
        let rule = self
            .client
            .create_rule(&body)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(envelope_result("rule", &to_value(&rule)?, &Meta::new()))
    }

    #[tool(description = "Update an existing network rule; only the supplied fields change")]
    async fn update_rule(
        &self,
        Parameters(p): Parameters<RuleUpdateParams>,
    ) -> Result<CallToolResult, McpError> {
        let body = rule_body(p.body);
        let rule = self
            .client
            .update_rule(&p.id, &body)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(envelope_result("rule", &to_value(&rule)?, &Meta::new()))
    }

    #[tool(description = "Delete a network rule by id")]
    async fn delete_rule(
        &self,
        Parameters(p): Parameters<RuleIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.client
            .delete_rule(&p.id)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(confirmation(format!("Rule {} deleted.", p.id)))
    }

    #[tool(description = "Pause a network rule by id")]
    async fn pause_rule(
        &self,
        Parameters(p): Parameters<RuleIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.client
            .pause_rule(&p.id)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(confirmation(format!("Rule {} paused.", p.id)))
    }

    #[tool(description = "Resume a paused network rule by id")]
    async fn resume_rule(
        &self,
        Parameters(p): Parameters<RuleIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.client
            .resume_rule(&p.id)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(confirmation(format!("Rule {} resumed.", p.id)))
    }

    // ── Flows ────────────────────────────────────────────────────────

    #[tool(description = "List network traffic flows, optionally filtered by a search query")]
    async fn get_flow_data(
        &self,
        Parameters(p): Parameters<ListParams>,
    ) -> Result<CallToolResult, McpError> {
        let meta = meta_of(&[("query", p.query.as_deref())]);
        let list_query = ListQuery {
            query: p.query,
            group_by: p.group_by,
            sort_by: p.sort_by,
            limit: p.limit,
            cursor: p.cursor,
        };
        let page = self
            .client
            .list_flows(&list_query)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(envelope_result("flows", &to_value(&page)?, &meta))
    }

    // ── Target lists ─────────────────────────────────────────────────

    #[tool(description = "List all target lists")]
    async fn get_target_lists(&self) -> Result<CallToolResult, McpError> {
        let page = self
            .client
            .list_target_lists()
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(envelope_result(
            "target_lists",
            &to_value(&page)?,
            &Meta::new(),
        ))
    }

    #[tool(description = "Fetch one target list by id")]
    async fn get_specific_target_list(
        &self,
        Parameters(p): Parameters<TargetListIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let list = self
            .client
            .get_target_list(&p.id)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(envelope_result(
            "target_lists",
            &single(to_value(&list)?),
            &Meta::new(),
        ))
    }

    #[tool(description = "Create a target list from a name and a set of targets")]
    async fn create_target_list(
        &self,
        Parameters(p): Parameters<TargetListCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        if p.targets.is_empty() {
            return Err(McpError::invalid_params(
                "targets must not be empty",
                None,
            ));
        }
        let body = TargetListCreateUpdate {
            name: Some(p.name),
            targets: Some(p.targets),
            owner: p.owner,
            category: p.category,
            notes: p.notes,
        };
        let list = self
            .client
            .create_target_list(&body)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(envelope_result(
            "target_list",
            &to_value(&list)?,
            &Meta::new(),
        ))
    }

    #[tool(description = "Update a target list; only the supplied fields change")]
    async fn update_target_list(
        &self,
        Parameters(p): Parameters<TargetListUpdateParams>,
    ) -> Result<CallToolResult, McpError> {
        let body = TargetListCreateUpdate {
            name: p.name,
            targets: p.targets,
            owner: p.owner,
            category: p.category,
            notes: p.notes,
        };
        let list = self
            .client
            .update_target_list(&p.id, &body)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(envelope_result(
            "target_list",
            &to_value(&list)?,
            &Meta::new(),
        ))
    }

    #[tool(description = "Delete a target list by id")]
    async fn delete_target_list(
        &self,
        Parameters(p): Parameters<TargetListIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.client
            .delete_target_list(&p.id)
            .await
            .map_err(|e| mcp_error(&e))?;
        Ok(confirmation(format!("Target list {} deleted.", p.id)))
    }

    // ── Statistics & trends ──────────────────────────────────────────

    #[tool(description = "Fleet-wide summary counters: boxes online/offline, alarms, rules")]
    async fn get_simple_statistics(
        &self,
        Parameters(p): Parameters<GroupParams>,
    ) -> Result<CallToolResult, McpError> {
        let stats = self
            .client
            .get_simple_stats(p.group.as_deref())
            .await
            .map_err(|e| mcp_error(&e))?;
        let meta = meta_of(&[("group", p.group.as_deref())]);
        Ok(envelope_result(
            "simple_statistics",
            &to_value(&stats)?,
            &meta,
        ))
    }

    #[tool(description = "Top regions ranked by blocked flows")]
    async fn get_statistics_by_region(
        &self,
        Parameters(p): Parameters<StatsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.ranked_stats(StatsType::TopRegionsByBlockedFlows, p.group, p.limit)
            .await
    }

    #[tool(
        description = "Top boxes ranked by blocked flows (default) or security alarms via `metric`"
    )]
    async fn get_statistics_by_box(
        &self,
        Parameters(p): Parameters<BoxStatsParams>,
    ) -> Result<CallToolResult, McpError> {
        let stats_type = match p.metric.as_deref() {
            None | Some("blocked_flows") => StatsType::TopBoxesByBlockedFlows,
            Some("security_alarms") => StatsType::TopBoxesBySecurityAlarms,
            Some(other) => {
                return Err(McpError::invalid_params(
                    format!("unknown metric `{other}`; expected `blocked_flows` or `security_alarms`"),
                    None,
                ));
            }
        };
        self.ranked_stats(stats_type, p.group, p.limit).await
    }

    #[tool(description = "Flow volume trend over time")]
    async fn get_flow_trends(
        &self,
        Parameters(p): Parameters<TrendParams>,
    ) -> Result<CallToolResult, McpError> {
        self.trends(TrendType::Flows, p.group).await
    }

    #[tool(description = "Alarm count trend over time")]
    async fn get_alarm_trends(
        &self,
        Parameters(p): Parameters<TrendParams>,
    ) -> Result<CallToolResult, McpError> {
        self.trends(TrendType::Alarms, p.group).await
    }

    #[tool(description = "Rule creation trend over time")]
    async fn get_rule_trends(
        &self,
        Parameters(p): Parameters<TrendParams>,
    ) -> Result<CallToolResult, McpError> {
        self.trends(TrendType::Rules, p.group).await
    }

    // ── Search ───────────────────────────────────────────────────────

    #[tool(
        description = "Search devices, alarms, rules, flows, and target lists with one query; \
partial failures are reported per entity type"
    )]
    async fn search_global(
        &self,
        Parameters(p): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let types = match p.types {
            Some(names) => {
                let mut entities = Vec::with_capacity(names.len());
                for name in &names {
                    let entity = SearchEntity::from_str(name).map_err(|_| {
                        McpError::invalid_params(
                            format!("unknown entity type `{name}`"),
                            None,
                        )
                    })?;
                    entities.push(entity);
                }
                entities
            }
            None => SearchEntity::all().to_vec(),
        };
        debug!(query = %p.query, types = types.len(), "global search");
        let report = self
            .client
            .search_all(&p.query, &types, p.limit, p.cursor.as_deref())
            .await;
        let meta = meta_of(&[("query", Some(p.query.as_str()))]);
        Ok(envelope_result("search_results", &to_value(&report)?, &meta))
    }
}

impl MspServer {
    async fn ranked_stats(
        &self,
        stats_type: StatsType,
        group: Option<String>,
        limit: Option<u32>,
    ) -> Result<CallToolResult, McpError> {
        let page = self
            .client
            .get_stats(stats_type, group.as_deref(), limit)
            .await
            .map_err(|e| mcp_error(&e))?;
        let kind = stats_type.to_string();
        let meta = meta_of(&[("stats_type", Some(kind.as_str())), ("group", group.as_deref())]);
        Ok(envelope_result("statistics", &to_value(&page)?, &meta))
    }

    async fn trends(
        &self,
        trend_type: TrendType,
        group: Option<String>,
    ) -> Result<CallToolResult, McpError> {
        let page = self
            .client
            .get_trends(trend_type, group.as_deref())
            .await
            .map_err(|e| mcp_error(&e))?;
        let kind = trend_type.to_string();
        let meta = meta_of(&[("trend_type", Some(kind.as_str())), ("group", group.as_deref())]);
        Ok(envelope_result("trends", &to_value(&page)?, &meta))
    }
}

/// Drop online devices from a fetched page and rewrite its count to
/// match what remains.
fn retain_offline(page: &mut ListResponse<Device>) {
    page.results.retain(|d| !d.is_online());
    page.count = Some(u64::try_from(page.results.len()).unwrap_or(u64::MAX));
}

/// Most-hit rules first.
fn sort_by_hits(rules: &mut [Rule]) {
    rules.sort_by(|a, b| b.hit_count().cmp(&a.hit_count()));
}

/// Newest rules first; rules without a timestamp sort last.
fn sort_by_recency(rules: &mut [Rule]) {
    rules.sort_by(|a, b| b.ts.partial_cmp(&a.ts).unwrap_or(std::cmp::Ordering::Equal));
}

/// Assemble the nested create/update body from the flat tool parameters.
fn rule_body(p: RuleBodyParams) -> RuleCreateUpdate {
    let target = if p.target_type.is_some() || p.target_value.is_some() || p.target_dns_only.is_some()
    {
        Some(RuleTarget {
            target_type: p.target_type,
            value: p.target_value,
            dns_only: p.target_dns_only,
        })
    } else {
        None
    };
    let scope = if p.scope_type.is_some() || p.scope_value.is_some() || p.scope_port.is_some() {
        Some(RuleScope {
            scope_type: p.scope_type,
            value: p.scope_value,
            port: p.scope_port,
        })
    } else {
        None
    };
    let schedule = if p.schedule_duration.is_some() || p.schedule_cron_time.is_some() {
        Some(RuleSchedule {
            duration: p.schedule_duration,
            cron_time: p.schedule_cron_time,
        })
    } else {
        None
    };
    RuleCreateUpdate {
        name: p.name,
        action: p.action,
        direction: p.direction,
        protocol: p.protocol,
        target,
        scope,
        schedule,
        notes: p.notes,
    }
}

#[tool_handler]
impl ServerHandler for MspServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(e: &McpError) -> i32 {
        e.code.0
    }

    #[test]
    fn client_faults_map_to_invalid_request() {
        let invalid_request = code_of(&McpError::invalid_request("x", None));
        let internal = code_of(&McpError::internal_error("x", None));

        assert_eq!(code_of(&mcp_error(&ApiError::InvalidToken)), invalid_request);
        assert_eq!(
            code_of(&mcp_error(&ApiError::NotFound {
                message: "no such rule".into()
            })),
            invalid_request
        );
        assert_eq!(
            code_of(&mcp_error(&ApiError::Validation {
                message: "target.value is required".into()
            })),
            invalid_request
        );
        assert_eq!(
            code_of(&mcp_error(&ApiError::Msp {
                status: 502,
                message: "bad gateway".into()
            })),
            internal
        );
    }

    #[test]
    fn upstream_message_survives_the_mapping() {
        let e = mcp_error(&ApiError::Validation {
            message: "target.value is required".into(),
        });
        assert!(e.message.contains("target.value is required"));
    }

    #[test]
    fn rule_body_nests_only_present_groups() {
        let body = rule_body(RuleBodyParams {
            action: Some("block".into()),
            target_value: Some("example.com".into()),
            ..RuleBodyParams::default()
        });
        assert_eq!(body.action.as_deref(), Some("block"));
        let target = body.target.as_ref().expect("target present");
        assert_eq!(target.value.as_deref(), Some("example.com"));
        assert!(body.scope.is_none());
        assert!(body.schedule.is_none());

        let json = serde_json::to_value(&body).expect("serializes");
        assert!(json.get("scope").is_none());
        assert!(json.get("schedule").is_none());
    }

    #[test]
    fn retain_offline_keeps_only_offline_and_rewrites_count() {
        let mut page: ListResponse<Device> = serde_json::from_value(json!({
            "results": [
                { "id": "d1", "name": "laptop", "online": true },
                { "id": "d2", "name": "printer", "online": false },
                { "id": "d3", "name": "camera" },
            ],
            "count": 3
        }))
        .expect("valid page");

        retain_offline(&mut page);

        assert_eq!(page.count, Some(2));
        assert!(page.results.iter().all(|d| !d.is_online()));
        let names: Vec<_> = page.results.iter().filter_map(|d| d.name.as_deref()).collect();
        assert_eq!(names, vec!["printer", "camera"]);
    }

    #[test]
    fn sort_by_hits_puts_most_active_first() {
        let mut rules: Vec<Rule> = serde_json::from_value(json!([
            { "id": "r1", "hit": { "count": 3 } },
            { "id": "r2", "hit": { "count": 40 } },
            { "id": "r3" },
        ]))
        .expect("valid rules");

        sort_by_hits(&mut rules);

        let ids: Vec<_> = rules.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["r2", "r1", "r3"]);
    }

    #[test]
    fn sort_by_recency_puts_newest_first_and_undated_last() {
        let mut rules: Vec<Rule> = serde_json::from_value(json!([
            { "id": "old", "ts": 1_000.0 },
            { "id": "undated" },
            { "id": "new", "ts": 2_000.0 },
        ]))
        .expect("valid rules");

        sort_by_recency(&mut rules);

        let ids: Vec<_> = rules.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);
    }

    #[test]
    fn single_wraps_into_list_shape() {
        let wrapped = single(json!({ "aid": 7 }));
        assert_eq!(wrapped["count"], 1);
        assert_eq!(wrapped["results"][0]["aid"], 7);
    }

    #[test]
    fn meta_of_skips_absent_pairs() {
        let meta = meta_of(&[("query", Some("x")), ("group", None)]);
        assert_eq!(meta.get("query").map(String::as_str), Some("x"));
        assert!(!meta.contains_key("group"));
    }
}
