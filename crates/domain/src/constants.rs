//! Application constants
//!
//! Centralized location for wire-level constants shared by the adapters,
//! the CSV exporter and the function boundary.

// Identity service
/// Cloud IAM token endpoint.
pub const DEFAULT_IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";
/// Grant type of the API key login.
pub const IAM_APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

// Agent chat service
/// Agent API host.
pub const DEFAULT_AGENT_API_HOST: &str = "api.us-south.watson-orchestrate.cloud.ibm.com";

// SQL job service
/// Path prefix of the SQL REST API.
pub const SQL_API_BASE_PATH: &str = "/dbapi/v4";
/// Header naming the database deployment.
pub const DEPLOYMENT_ID_HEADER: &str = "x-deployment-id";
/// Interaction log table.
pub const DEFAULT_LOG_TABLE: &str = "WXO_LOG";
/// Row limit of the log export.
pub const DEFAULT_ROW_LIMIT: u32 = 5000;
/// Statement separator sent with every job.
pub const SQL_STATEMENT_SEPARATOR: &str = ";";

// Polling
/// Polls before a job is reported as timed out.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;
/// Sleep before each poll.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

// HTTP transport
/// Per-request timeout.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
/// `User-Agent` sent to the remote services.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

// CSV export
/// Prefix of every generated CSV body.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
/// Header of the batch results CSV.
pub const BATCH_COLUMNS: [&str; 3] = ["Question", "Answer", "Status"];
/// Question column headers, tried in order.
pub const QUESTION_COLUMN_ALIASES: [&str; 5] = ["Question", "question", "質問", "input", "Input"];
/// Status of an answered question.
pub const STATUS_SUCCESS: &str = "Success";
/// Status of a blank question.
pub const STATUS_SKIPPED: &str = "Skipped";
/// Attachment name of the batch results.
pub const BATCH_EXPORT_FILENAME: &str = "wxo_results.csv";
/// Attachment name of the log export.
pub const LOG_EXPORT_FILENAME: &str = "wxo_logs.csv";

// Function boundary headers
/// CSV body content type.
pub const CONTENT_TYPE_CSV: &str = "text/csv; charset=utf-8";
/// JSON body content type.
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Header name.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// Header name.
pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
/// Header name.
pub const HEADER_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
/// Header name.
pub const HEADER_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
/// Header name.
pub const HEADER_CONTENT_DISPOSITION: &str = "Content-Disposition";
/// Header reporting whether the export job finished.
pub const HEADER_JOB_STATUS: &str = "X-Job-Status";
/// Any origin may call the functions.
pub const ALLOW_ANY_ORIGIN: &str = "*";
/// Methods answered by the functions.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
/// Request headers accepted cross-origin.
pub const ALLOWED_HEADERS: &str = "Content-Type";
