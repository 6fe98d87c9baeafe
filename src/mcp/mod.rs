pub mod context;
pub mod format;
pub mod resources;
pub mod tools;

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject,
    ListResourceTemplatesResult, ListToolsResult, PaginatedRequestParams,
    ReadResourceRequestParams, ReadResourceResult, ResourceContents, ResourceTemplate,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;

use crate::config::types::Credentials;
use crate::error::{AtlassianError, Result};
use context::AppContext;
use resources::{RESOURCE_TEMPLATES, ResourceRef, ResourceTemplateSpec};
use tools::{Arguments, ToolCall, ToolKind};

const INSTRUCTIONS: &str = "Read-only access to Confluence and Jira. \
    Use the *_by_url tools when you have a link; failed calls return text starting with 'Error:'.";

/// Protocol-agnostic dispatch surface: enumerates tools and resources and
/// routes each invocation to one client operation.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    context: Arc<AppContext>,
}

impl Dispatcher {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn tools(&self) -> &'static [ToolKind] {
        &ToolKind::ALL
    }

    pub fn resource_templates(&self) -> &'static [ResourceTemplateSpec] {
        &RESOURCE_TEMPLATES
    }

    /// Run a tool and return its text payload.
    ///
    /// Never fails: every error becomes an `Error: ...` string so the
    /// protocol's own error channel stays unused for tool calls.
    pub async fn call_tool(&self, name: &str, arguments: &Arguments) -> String {
        match self.try_call_tool(name, arguments).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(tool = name, error = %err, "tool call failed");
                format::render_error(&err)
            }
        }
    }

    async fn try_call_tool(&self, name: &str, arguments: &Arguments) -> Result<String> {
        let call = ToolCall::parse(name, arguments)?;
        let client = self.context.client().await?;
        tracing::debug!(tool = call.kind().name(), "calling tool");
        let value = call.execute(client).await?;
        format::render_json(&value)
    }

    /// Read a resource URI and return the entity as pretty JSON.
    pub async fn read_resource(&self, uri: &str) -> Result<String> {
        let client = self.context.client().await?;
        let resource = ResourceRef::parse(uri)?;
        let value = resource.fetch(client).await?;
        format::render_json(&value)
    }
}

/// rmcp handler backed by a `Dispatcher`.
#[derive(Debug, Clone)]
pub struct AtlassianServer {
    dispatcher: Dispatcher,
}

impl AtlassianServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

fn schema_object(schema: Value) -> Arc<JsonObject> {
    match schema {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

fn protocol_tools() -> Vec<Tool> {
    ToolKind::ALL
        .iter()
        .map(|kind| Tool::new(kind.name(), kind.description(), schema_object(kind.input_schema())))
        .collect()
}

/// Tool output, success or `Error:` text alike, travels as an ordinary result.
fn tool_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

fn resource_template(spec: &ResourceTemplateSpec) -> std::result::Result<ResourceTemplate, McpError> {
    serde_json::to_value(spec)
        .and_then(serde_json::from_value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))
}

fn to_mcp_error(err: AtlassianError) -> McpError {
    match err {
        AtlassianError::InvalidResource { .. }
        | AtlassianError::InvalidArgument { .. }
        | AtlassianError::NotConfigured { .. } => McpError::invalid_params(err.to_string(), None),
        AtlassianError::Upstream { status: 404, .. } => {
            McpError::resource_not_found(err.to_string(), None)
        }
        _ => McpError::internal_error(err.to_string(), None),
    }
}

impl ServerHandler for AtlassianServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "atlassian-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(protocol_tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();
        let text = self.dispatcher.call_tool(request.name.as_ref(), &arguments).await;
        Ok(tool_result(text))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourceTemplatesResult, McpError> {
        let templates = self
            .dispatcher
            .resource_templates()
            .iter()
            .map(resource_template)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ListResourceTemplatesResult::with_all_items(templates))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        let text = self
            .dispatcher
            .read_resource(&request.uri)
            .await
            .map_err(|err| {
                tracing::error!(uri = %request.uri, error = %err, "resource read failed");
                to_mcp_error(err)
            })?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}

/// Start the MCP server over stdio. Blocks until the connection closes,
/// then releases the upstream client.
pub fn serve_stdio(credentials: Credentials) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let context = Arc::new(AppContext::new(credentials));
        let server = AtlassianServer::new(Dispatcher::new(Arc::clone(&context)));

        tracing::info!("serving MCP over stdio");
        let service = server.serve(rmcp::transport::stdio()).await?;
        service.waiting().await?;

        match Arc::try_unwrap(context) {
            Ok(mut context) => context.shutdown(),
            Err(_) => tracing::warn!("client still in use at shutdown, leaving it to drop"),
        }

        Ok(())
    })
}
