//! Record code knowledge base.
//!
//! Every statistics line carries a four or five character record code
//! (`PSTR`, `CTRC`, `SUBP`, ...) identifying what happened. This module maps
//! those codes to a [`RecordId`] with a category and a readable description.
//!
//! Codes follow the Connect:Direct statistics record reference:
//! <https://www.ibm.com/docs/en/connect-direct/6.3.0?topic=processes-submitting-process>

use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// The broad family a record code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordCategory {
    Process,
    Event,
    #[serde(rename = "External Source")]
    ExternalSource,
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordCategory::Process => write!(f, "Process"),
            RecordCategory::Event => write!(f, "Event"),
            RecordCategory::ExternalSource => write!(f, "External Source"),
        }
    }
}

/// Identity of a statistics record code.
///
/// Known codes are constants in this module, except the `static`
/// [`TCQ_CHANGE`]. Codes missing from the
/// table are represented by [`RecordId::unknown`], which carries only the
/// upper-cased code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordId {
    pub code: Cow<'static, str>,
    pub category: Option<RecordCategory>,
    pub description: &'static str,
}

impl RecordId {
    const fn known(
        code: &'static str,
        category: RecordCategory,
        description: &'static str,
    ) -> Self {
        Self {
            code: Cow::Borrowed(code),
            category: Some(category),
            description,
        }
    }

    /// A placeholder for a code the knowledge base does not know.
    pub fn unknown(code: &str) -> Self {
        Self {
            code: Cow::Owned(code.to_uppercase()),
            category: None,
            description: "",
        }
    }

    /// Look up `code`, falling back to [`RecordId::unknown`].
    pub fn resolve(code: &str) -> Self {
        match lookup_record_id(code) {
            Some(id) => id.clone(),
            None => Self::unknown(code),
        }
    }

    /// True when this id came from the knowledge base.
    pub fn is_known(&self) -> bool {
        self.category.is_some()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

use RecordCategory::{Event, ExternalSource, Process};

pub const CLIENT_MANAGER_COMM_TERMINATION: RecordId =
    RecordId::known("CMOT", Event, "Client manager comm termination");
pub const SECURE_PLUS: RecordId = RecordId::known("CSPA", Process, "Secure+");
pub const STRONG_PASSWORD_ENCRYPTION: RecordId =
    RecordId::known("CSPE", Event, "Strong Password Encryption");
pub const COPY_TERMINATION_RECORD: RecordId =
    RecordId::known("CTRC", Process, "Copy Termination Record");
pub const EXTERNAL_INTEGRATED_FILE_AGENT: RecordId =
    RecordId::known("EXFA", ExternalSource, "External Integrated File Agent");
pub const FMH_SENT: RecordId = RecordId::known("FMSD", Process, "FMH sent");
pub const FMH_RECEIVED: RecordId = RecordId::known("FMRV", Process, "FMH received");
pub const STEP_ENDED_FOR_IF: RecordId = RecordId::known("IFED", Process, "Step ended for IF");
pub const STEP_ENDED_FOR_RUN_TASK: RecordId =
    RecordId::known("RJED", Process, "Step ended for RUN TASK");
pub const STEP_ENDED_FOR_RUN_JOB: RecordId =
    RecordId::known("RTED", Process, "Step ended for RUN JOB");
pub const STEP_ENDED_FOR_SUBMIT: RecordId =
    RecordId::known("SBED", Process, "Step ended for SUBMIT");
pub const STEP_ENDED_FOR_OTHER: RecordId =
    RecordId::known("PSED", Process, "Step ended for other");
pub const SESSION_MANAGER: RecordId = RecordId::known("LSMG", Process, "Session Manager");
pub const LOCAL_STEP_STARTED: RecordId = RecordId::known("LSST", Process, "Local step started");
pub const REMOTE_STEP_STARTED: RecordId =
    RecordId::known("RSST", Process, "Remote step started");
pub const SERVER_STARTUP: RecordId = RecordId::known("NUIC", Event, "Server Startup");
pub const SERVER_SHUTDOWN_NUTR: RecordId = RecordId::known("NUTR", Event, "Server Shutdown");
pub const SERVER_SHUTDOWN_NUT1: RecordId = RecordId::known("NUT1", Event, "Server Shutdown");
pub const SERVER_SHUTDOWN_NUT2: RecordId = RecordId::known("NUT2", Event, "Server Shutdown");
pub const SERVER_SHUTDOWN_NUTC: RecordId = RecordId::known("NUTC", Event, "Server Shutdown");
pub const SERVER_SHUTDOWN_NUIS: RecordId = RecordId::known("NUIS", Event, "Server Shutdown");
pub const PROCESS_MANAGER_INITIALIZING: RecordId =
    RecordId::known("PMIP", Event, "Process manager initializing");
pub const PROCESS_MANAGER_STARTED: RecordId =
    RecordId::known("PMST", Event, "Process manager started");
pub const PROCESS_MANAGER_ENDED: RecordId =
    RecordId::known("PMED", Event, "Process manager ended");
pub const TCQ_MAX_AGE_PROCESSING: RecordId =
    RecordId::known("PMMX", Event, "TCQ max age processing");
pub const PROCESS_STARTED: RecordId = RecordId::known("PSTR", Event, "Process started");
pub const PROCESS_ENDED: RecordId = RecordId::known("PRED", Event, "Process ended");
pub const PROCESS_ERROR: RecordId = RecordId::known("PERR", Event, "Process error");
pub const PROCESS_INTERRUPTED: RecordId = RecordId::known("PRIN", Event, "Process interrupted");
pub const PROCESS_FLUSHED: RecordId = RecordId::known("PFLS", Event, "Process flushed");
pub const PROCESS_SAVED: RecordId = RecordId::known("PSAV", Event, "Process saved");
/// Any `QC` code; the trailing characters usually name the new queue.
///
/// A `static` rather than a `const`: it is matched by prefix instead of
/// living in the lookup table, so [`lookup_record_id`] hands out
/// `&TCQ_CHANGE` directly and needs a `'static` address.
pub static TCQ_CHANGE: RecordId = RecordId::known(
    "QCxx",
    Event,
    "TCQ change (xx typically identifies the new queue)",
);
pub const CONCURRENT_SESSION_COUNT: RecordId =
    RecordId::known("SCNT", Event, "Concurrent session count");
pub const SELECT_FUNCTIONAL_AUTHORITIES: RecordId =
    RecordId::known("SLFA", Event, "Select functional authorities");
pub const CHANGE_FUNCTIONAL_AUTHORITIES: RecordId =
    RecordId::known("CHFA", Event, "Change functional authorities");
pub const DELETE_FUNCTIONAL_AUTHORITIES: RecordId =
    RecordId::known("DLFA", Event, "Delete functional authorities");
pub const AUTHORIZATION_FILE_PROCESSING: RecordId =
    RecordId::known("AUPR", Event, "Authorization file processing");
pub const SELECT_INITPARMS: RecordId = RecordId::known("SLIP", Event, "Select initparms");
pub const UPDATE_INITPARMS: RecordId = RecordId::known("IPPR", Event, "Update initparms");
pub const REFRESH_INITPARMS: RecordId = RecordId::known("RFIP", Event, "Refresh initparms");
pub const SELECT_NETMAP: RecordId = RecordId::known("SLNM", Event, "Select netmap");
pub const CHANGE_NETMAP: RecordId = RecordId::known("CHNM", Event, "Change netmap");
pub const NETMAP_PROCESS: RecordId = RecordId::known("NMPR", Event, "Netmap process");
pub const SELECT_PROXY: RecordId = RecordId::known("SLPX", Event, "Select proxy");
pub const CHANGE_PROXY: RecordId = RecordId::known("CHPX", Event, "Change proxy");
pub const DELETE_PROXY: RecordId = RecordId::known("DLPX", Event, "Delete proxy");
pub const SESSION_MANAGER_INITIALIZED: RecordId =
    RecordId::known("SMIN", Event, "Session manager initialized");
pub const SESSION_MANAGER_ENDED: RecordId =
    RecordId::known("SMED", Event, "Session manager ended");
pub const SELECT_PROCESS_RESPONSE: RecordId =
    RecordId::known("SRSP", Event, "Select process response");
pub const STATISTICS_RESPONSE: RecordId =
    RecordId::known("STRS", Event, "Select statistics response");
pub const SESSION_STARTED: RecordId = RecordId::known("SSTR", Event, "Session started");
pub const SESSION_ENDED: RecordId = RecordId::known("SEND", Event, "Session ended");
pub const SESSION_ERROR: RecordId = RecordId::known("SERR", Event, "Session error");
pub const SHUTDOWN_COMMAND: RecordId = RecordId::known("STOP", Event, "Shutdown command");
pub const SUBMIT_PROCESS: RecordId = RecordId::known("SUBP", Process, "Submit process");
pub const CHANGE_PROCESS: RecordId = RecordId::known("CHCG", Process, "Change process");
pub const DELETE_PROCESS: RecordId = RecordId::known("DELP", Process, "Delete process");
pub const TRACE_ON: RecordId = RecordId::known("TRON", Event, "Trace on");
pub const TRACE_OFF: RecordId = RecordId::known("TROFF", Event, "Trace off");
pub const USER_SECURITY: RecordId = RecordId::known("USEC", Process, "User security");

// Warnings

/// Copy steps to an object store with checkpointing enabled can report
/// XCPK005W when checkpointing was disabled for the step (APAR IT41867).
pub const CHECKPOINTING_DISABLED: RecordId = RecordId::known(
    "XCPK",
    Process,
    "Checkpointing was disabled for the copy step",
);

/// Exact-match entries. `QC` codes are matched by prefix and are not listed.
static KNOWN_RECORD_IDS: [RecordId; 60] = [
    CLIENT_MANAGER_COMM_TERMINATION,
    SECURE_PLUS,
    STRONG_PASSWORD_ENCRYPTION,
    COPY_TERMINATION_RECORD,
    EXTERNAL_INTEGRATED_FILE_AGENT,
    FMH_SENT,
    FMH_RECEIVED,
    STEP_ENDED_FOR_IF,
    STEP_ENDED_FOR_RUN_TASK,
    STEP_ENDED_FOR_RUN_JOB,
    STEP_ENDED_FOR_SUBMIT,
    STEP_ENDED_FOR_OTHER,
    SESSION_MANAGER,
    LOCAL_STEP_STARTED,
    REMOTE_STEP_STARTED,
    SERVER_STARTUP,
    SERVER_SHUTDOWN_NUTR,
    SERVER_SHUTDOWN_NUT1,
    SERVER_SHUTDOWN_NUT2,
    SERVER_SHUTDOWN_NUTC,
    SERVER_SHUTDOWN_NUIS,
    PROCESS_MANAGER_INITIALIZING,
    PROCESS_MANAGER_STARTED,
    PROCESS_MANAGER_ENDED,
    TCQ_MAX_AGE_PROCESSING,
    PROCESS_STARTED,
    PROCESS_ENDED,
    PROCESS_ERROR,
    PROCESS_INTERRUPTED,
    PROCESS_FLUSHED,
    PROCESS_SAVED,
    CONCURRENT_SESSION_COUNT,
    SELECT_FUNCTIONAL_AUTHORITIES,
    CHANGE_FUNCTIONAL_AUTHORITIES,
    DELETE_FUNCTIONAL_AUTHORITIES,
    AUTHORIZATION_FILE_PROCESSING,
    SELECT_INITPARMS,
    UPDATE_INITPARMS,
    REFRESH_INITPARMS,
    SELECT_NETMAP,
    CHANGE_NETMAP,
    NETMAP_PROCESS,
    SELECT_PROXY,
    CHANGE_PROXY,
    DELETE_PROXY,
    SESSION_MANAGER_INITIALIZED,
    SESSION_MANAGER_ENDED,
    SELECT_PROCESS_RESPONSE,
    STATISTICS_RESPONSE,
    SESSION_STARTED,
    SESSION_ENDED,
    SESSION_ERROR,
    SHUTDOWN_COMMAND,
    SUBMIT_PROCESS,
    CHANGE_PROCESS,
    DELETE_PROCESS,
    TRACE_ON,
    TRACE_OFF,
    USER_SECURITY,
    CHECKPOINTING_DISABLED,
];

static RECORD_CODES: LazyLock<HashMap<&'static str, &'static RecordId>> = LazyLock::new(|| {
    KNOWN_RECORD_IDS
        .iter()
        .map(|id| (&*id.code, id))
        .collect()
});

/// Look up a record code (like `CTRC`) and return its [`RecordId`].
///
/// The code is upper-cased first. Any code starting with `QC` resolves to
/// [`TCQ_CHANGE`]. Returns `None` for codes the table does not know; callers
/// decide whether to fall back to [`RecordId::unknown`].
pub fn lookup_record_id(code: &str) -> Option<&'static RecordId> {
    let code = code.to_uppercase();

    if code.starts_with("QC") {
        return Some(&TCQ_CHANGE);
    }

    RECORD_CODES.get(code.as_str()).copied()
}

/// All record ids in the knowledge base, `QC` family last.
pub fn known_record_ids() -> impl Iterator<Item = &'static RecordId> {
    KNOWN_RECORD_IDS.iter().chain(std::iter::once(&TCQ_CHANGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_exact_code() {
        assert_eq!(lookup_record_id("CTRC"), Some(&COPY_TERMINATION_RECORD));
        assert_eq!(lookup_record_id("PSTR"), Some(&PROCESS_STARTED));
        assert_eq!(lookup_record_id("TROFF"), Some(&TRACE_OFF));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup_record_id("subp"), Some(&SUBMIT_PROCESS));
        assert_eq!(lookup_record_id("Xcpk"), Some(&CHECKPOINTING_DISABLED));
    }

    #[test]
    fn test_lookup_qc_prefix() {
        assert_eq!(lookup_record_id("QC9Z"), Some(&TCQ_CHANGE));
        assert_eq!(lookup_record_id("QC00"), Some(&TCQ_CHANGE));
        assert_eq!(lookup_record_id("qcwa"), Some(&TCQ_CHANGE));
        assert_eq!(lookup_record_id("QC"), Some(&TCQ_CHANGE));
    }

    #[test]
    fn test_lookup_unknown_is_absent() {
        assert_eq!(lookup_record_id("ZZZZ"), None);
        assert_eq!(lookup_record_id(""), None);
        // Q alone is not the QC family
        assert_eq!(lookup_record_id("QXYZ"), None);
    }

    #[test]
    fn test_resolve_synthesizes_unknown() {
        let id = RecordId::resolve("zzzz");
        assert_eq!(id.code, "ZZZZ");
        assert_eq!(id.category, None);
        assert_eq!(id.description, "");
        assert!(!id.is_known());

        let id = RecordId::resolve("ctrc");
        assert_eq!(id, COPY_TERMINATION_RECORD);
        assert!(id.is_known());
    }

    #[test]
    fn test_table_has_unique_upper_case_codes() {
        let mut seen = HashSet::new();
        for id in &KNOWN_RECORD_IDS {
            assert_eq!(id.code, id.code.to_uppercase(), "{} not upper case", id.code);
            assert!(seen.insert(&*id.code), "duplicate code {}", id.code);
            assert!(!id.code.starts_with("QC"));
        }
        assert_eq!(RECORD_CODES.len(), KNOWN_RECORD_IDS.len());
    }

    #[test]
    fn test_tcq_change_has_one_address() {
        let a = lookup_record_id("QC00").unwrap();
        let b = lookup_record_id("QC9Z").unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(std::ptr::eq(a, &TCQ_CHANGE));
    }

    #[test]
    fn test_known_record_ids_includes_tcq_change() {
        let ids: Vec<_> = known_record_ids().collect();
        assert_eq!(ids.len(), KNOWN_RECORD_IDS.len() + 1);
        assert_eq!(ids.last(), Some(&&TCQ_CHANGE));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(RecordCategory::Process.to_string(), "Process");
        assert_eq!(RecordCategory::ExternalSource.to_string(), "External Source");
        assert_eq!(EXTERNAL_INTEGRATED_FILE_AGENT.category, Some(ExternalSource));
    }
}
