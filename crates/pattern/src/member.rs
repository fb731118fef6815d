//! Member-name pattern derivation.
//!
//! A member check's string argument is turned into a regular expression
//! over fully qualified names. A `?`-prefixed pattern is used verbatim;
//! anything else is treated as a literal identifier anchored at a name
//! boundary, with a per-kind tail so `M` finds `System.Void Foo::M()`
//! when used as a method pattern.

use ilregex_common::MemberKind;
use regex::Regex;

use crate::error::CompileError;

/// The optional single generic parameter a type name may carry.
const GENERIC_TAIL: &str = r"(?:<[A-Za-z_]\w*>)?";

/// Build the matching regex for a member-name check.
pub(crate) fn derive_member_regex(
    kind: MemberKind,
    pattern: &str,
) -> Result<Regex, CompileError> {
    let source = match pattern.strip_prefix('?') {
        Some(verbatim) => verbatim.to_string(),
        None => {
            // The boundary set includes ':' so the member segment of a
            // qualified name (`Foo::M`) is reachable.
            let mut source = String::from(r"(?:^| |[.:])");
            source.push_str(&regex::escape(pattern));
            match kind {
                MemberKind::Field | MemberKind::CallSite => {}
                MemberKind::Type => source.push_str(GENERIC_TAIL),
                MemberKind::Method => {
                    source.push_str(GENERIC_TAIL);
                    source.push_str(r"\(.*\)");
                }
            }
            source
        }
    };
    Regex::new(&source).map_err(|e| CompileError::BadMemberPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
