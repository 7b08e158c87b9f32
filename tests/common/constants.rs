//! Shared constants for end-to-end tests
//!
//! When test data changes (participants, sheet content, OAuth values),
//! update only this file and fixtures.rs.
#![allow(dead_code)]

// ============================================================================
// Spreadsheet
// ============================================================================

pub const SPREADSHEET_ID: &str = "e2e-spreadsheet";

/// Sheet holding the artist roster (`Artist | Track | Link`)
pub const ARTISTS_SHEET: &str = "Artists";

/// Sheet holding the vote ledger
pub const VOTES_SHEET: &str = "Votes";

/// Sheet holding suggested extra tracks
pub const EXTRA_SHEET: &str = "Extra";

// ============================================================================
// Participants
// ============================================================================

pub const HOST_ID: &str = "hannah";

pub const GUEST_1_ID: &str = "george";

pub const GUEST_2_ID: &str = "gwen";

// ============================================================================
// Artists (display name, safe key)
// ============================================================================

pub const ARTIST_1_NAME: &str = "AC/DC";
pub const ARTIST_1_KEY: &str = "AC_DC";

pub const ARTIST_2_NAME: &str = "Sigur Rós";
pub const ARTIST_2_KEY: &str = "Sigur_Rós";

pub const ARTIST_3_NAME: &str = "Daft Punk";
pub const ARTIST_3_KEY: &str = "Daft_Punk";

// ============================================================================
// Spotify OAuth
// ============================================================================

pub const CLIENT_ID: &str = "e2e-client";

pub const CLIENT_SECRET: &str = "e2e-secret";

pub const FRONTEND_URI: &str = "http://localhost:3000";

/// The only authorization code the fake accounts service accepts
pub const VALID_CODE: &str = "valid-code";

/// The only refresh token the fake accounts service accepts
pub const VALID_REFRESH_TOKEN: &str = "valid-refresh-token";

pub const ISSUED_ACCESS_TOKEN: &str = "issued-access-token";

pub const ISSUED_REFRESH_TOKEN: &str = "issued-refresh-token";

pub const REFRESHED_ACCESS_TOKEN: &str = "refreshed-access-token";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for server to be ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
