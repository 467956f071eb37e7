//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 5001;

// =============================================================================
// Database (MongoDB)
// =============================================================================

/// Default MongoDB connection URI (for development)
pub const DEFAULT_MONGODB_URI: &str = "mongodb://127.0.0.1:27017";

/// Database name for the development and production presets
pub const DEFAULT_DATABASE_NAME: &str = "ccms_db";

/// Database name for the testing preset
pub const TEST_DATABASE_NAME: &str = "ccms_test_db";

/// Upper bound on MongoDB server selection at startup, in seconds
pub const SERVER_SELECTION_TIMEOUT_SECS: u64 = 10;

/// Upper bound on the /health liveness ping, in seconds
pub const HEALTH_PROBE_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// Request pipeline
// =============================================================================

/// CORS: headers the browser may send on cross-origin requests
pub const CORS_ALLOW_HEADERS: &str = "Content-Type,Authorization";

/// CORS: methods allowed on cross-origin requests
pub const CORS_ALLOW_METHODS: &str = "GET,PUT,POST,DELETE,OPTIONS";

/// Maximum number of bytes of a response body echoed to the request log
pub const BODY_PREVIEW_LIMIT: usize = 100;
