//! Trigger function registry
//!
//! Every known function maps to a signature: either no parameters at all, or an
//! ordered list of parameter specs checked positionally.

use std::collections::HashMap;
use std::sync::OnceLock;

/// What a parameter value must look like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Any text
    StringOrUserMacro,
    /// Digits with an optional time suffix
    SecondsOrUserMacro,
    /// Seconds, or `#N` value count with N > 0
    SecondsOrCountOrUserMacro,
    /// Optional sign, digits, optional fraction and unit suffix
    NumericOrUserMacro,
    /// Unsigned number from 0 to 100 with at most four decimals
    PercentOrUserMacro,
    /// One of the `count` comparison operators
    OperatorOrUserMacro,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::StringOrUserMacro => "string",
            ParamKind::SecondsOrUserMacro => "seconds",
            ParamKind::SecondsOrCountOrUserMacro => "seconds or #count",
            ParamKind::NumericOrUserMacro => "numeric value",
            ParamKind::PercentOrUserMacro => "percentage",
            ParamKind::OperatorOrUserMacro => "comparison operator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub mandatory: bool,
    pub kind: ParamKind,
    /// Zero is an acceptable period or count
    pub allow_zero: bool,
}

impl ParamSpec {
    const fn new(mandatory: bool, kind: ParamKind, allow_zero: bool) -> Self {
        Self {
            mandatory,
            kind,
            allow_zero,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: &'static str,
    /// `None` for functions that take no parameters
    pub params: Option<&'static [ParamSpec]>,
}

impl FunctionSignature {
    /// Largest number of parameters a call may pass
    pub fn max_params(&self) -> usize {
        self.params.map_or(0, |params| params.len())
    }
}

// ============================================================================
// SIGNATURES
// ============================================================================

use ParamKind::*;

const PERIOD: ParamSpec = ParamSpec::new(true, SecondsOrCountOrUserMacro, false);
const OPTIONAL_PERIOD: ParamSpec = ParamSpec::new(false, SecondsOrCountOrUserMacro, true);
const OPTIONAL_NONZERO_PERIOD: ParamSpec = ParamSpec::new(false, SecondsOrCountOrUserMacro, false);
const TIME_SHIFT: ParamSpec = ParamSpec::new(false, SecondsOrUserMacro, true);
const PATTERN: ParamSpec = ParamSpec::new(true, StringOrUserMacro, true);
const OPTIONAL_STRING: ParamSpec = ParamSpec::new(false, StringOrUserMacro, true);
const NUMERIC: ParamSpec = ParamSpec::new(true, NumericOrUserMacro, true);
const PERCENT: ParamSpec = ParamSpec::new(true, PercentOrUserMacro, true);
const OPERATOR: ParamSpec = ParamSpec::new(false, OperatorOrUserMacro, true);

const AGGREGATE: &[ParamSpec] = &[PERIOD, TIME_SHIFT];
const LAST: &[ParamSpec] = &[OPTIONAL_PERIOD, TIME_SHIFT];
const BAND: &[ParamSpec] = &[OPTIONAL_PERIOD, NUMERIC, TIME_SHIFT];
const COUNT: &[ParamSpec] = &[PERIOD, OPTIONAL_STRING, OPERATOR, TIME_SHIFT];
const PERCENTILE: &[ParamSpec] = &[PERIOD, TIME_SHIFT, PERCENT];
const FUZZYTIME: &[ParamSpec] = &[ParamSpec::new(true, SecondsOrUserMacro, true)];
const NODATA: &[ParamSpec] = &[ParamSpec::new(true, SecondsOrUserMacro, false)];
const STRING_MATCH: &[ParamSpec] = &[PATTERN, OPTIONAL_NONZERO_PERIOD];
const LOG_MATCH: &[ParamSpec] = &[PATTERN];
const FORECAST: &[ParamSpec] = &[
    PERIOD,
    TIME_SHIFT,
    ParamSpec::new(true, SecondsOrUserMacro, true),
    OPTIONAL_STRING,
    OPTIONAL_STRING,
];
const TIMELEFT: &[ParamSpec] = &[PERIOD, TIME_SHIFT, NUMERIC, OPTIONAL_STRING];

const fn signature(name: &'static str, params: Option<&'static [ParamSpec]>) -> FunctionSignature {
    FunctionSignature { name, params }
}

pub const FUNCTIONS: &[FunctionSignature] = &[
    signature("abschange", None),
    signature("change", None),
    signature("date", None),
    signature("dayofmonth", None),
    signature("dayofweek", None),
    signature("diff", None),
    signature("logseverity", None),
    signature("now", None),
    signature("prev", None),
    signature("time", None),
    signature("avg", Some(AGGREGATE)),
    signature("delta", Some(AGGREGATE)),
    signature("max", Some(AGGREGATE)),
    signature("min", Some(AGGREGATE)),
    signature("sum", Some(AGGREGATE)),
    signature("last", Some(LAST)),
    signature("strlen", Some(LAST)),
    signature("band", Some(BAND)),
    signature("count", Some(COUNT)),
    signature("percentile", Some(PERCENTILE)),
    signature("fuzzytime", Some(FUZZYTIME)),
    signature("nodata", Some(NODATA)),
    signature("regexp", Some(STRING_MATCH)),
    signature("iregexp", Some(STRING_MATCH)),
    signature("str", Some(STRING_MATCH)),
    signature("logeventid", Some(LOG_MATCH)),
    signature("logsource", Some(LOG_MATCH)),
    signature("forecast", Some(FORECAST)),
    signature("timeleft", Some(TIMELEFT)),
];

// ============================================================================
// LOOKUP
// ============================================================================

static FUNCTION_REGISTRY: OnceLock<HashMap<&'static str, FunctionSignature>> = OnceLock::new();

fn get_function_registry() -> &'static HashMap<&'static str, FunctionSignature> {
    FUNCTION_REGISTRY.get_or_init(|| FUNCTIONS.iter().map(|f| (f.name, *f)).collect())
}

pub fn lookup_function(name: &str) -> Option<&'static FunctionSignature> {
    get_function_registry().get(name)
}

pub fn is_known_function(name: &str) -> bool {
    get_function_registry().contains_key(name)
}
