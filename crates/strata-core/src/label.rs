//! Label rules shared by the arena and the facade.
//!
//! Every slot carries a human-readable label. The fallback slot is always
//! labelled [`FALLBACK_LABEL`]; scopes opened without a usable label fall
//! back to the short type name of their context, or to [`ANONYMOUS_LABEL`]
//! when there is no context either.

/// Label of the permanent fallback slot, and of every freed slot.
pub const FALLBACK_LABEL: &str = "Fallback";

/// Label used when a scope is opened with neither a label nor a context.
pub const ANONYMOUS_LABEL: &str = "Anonymous";

/// Separator placed between ancestor labels when rendering a scope path.
pub const PATH_SEPARATOR: &str = "::";

/// Short, unqualified name of `T`.
///
/// Generic arguments and module paths are stripped, so
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    strip_type_path(std::any::type_name::<T>())
}

fn strip_type_path(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Pick the label a new scope is stored under.
///
/// An explicit label wins unless it is empty or whitespace. Otherwise the
/// context's type name is used, and finally [`ANONYMOUS_LABEL`].
pub fn resolve_label(label: Option<&str>, context_type: Option<&str>) -> String {
    match label {
        Some(l) if !l.trim().is_empty() => l.to_owned(),
        _ => context_type.unwrap_or(ANONYMOUS_LABEL).to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Player;

    #[test]
    fn short_type_name_strips_paths_and_generics() {
        assert_eq!(short_type_name::<Player>(), "Player");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
        assert_eq!(short_type_name::<u32>(), "u32");
        assert_eq!(short_type_name::<str>(), "str");
    }

    #[test]
    fn explicit_label_wins() {
        assert_eq!(resolve_label(Some("load"), Some("Player")), "load");
    }

    #[test]
    fn blank_label_falls_back_to_context_type() {
        assert_eq!(resolve_label(Some("   "), Some("Player")), "Player");
        assert_eq!(resolve_label(None, Some("Player")), "Player");
    }

    #[test]
    fn nothing_given_is_anonymous() {
        assert_eq!(resolve_label(None, None), ANONYMOUS_LABEL);
        assert_eq!(resolve_label(Some(""), None), ANONYMOUS_LABEL);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn resolved_label_is_never_blank(
                label in proptest::option::of("[ a-z]{0,8}"),
                ctx in proptest::option::of("[A-Z][a-z]{0,6}"),
            ) {
                let resolved = resolve_label(label.as_deref(), ctx.as_deref());
                prop_assert!(!resolved.trim().is_empty());
            }
        }
    }
}
