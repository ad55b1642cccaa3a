use std::collections::{BTreeMap, BTreeSet};

/// Derives an upper snake case Java constant name from a literal.
///
/// A boundary goes before an uppercase letter that follows a lowercase letter
/// or digit, before a digit that follows a non-digit, and in place of every run
/// of other characters. A value starting with a digit gets a leading `_`.
/// Returns an empty string when the literal has no ASCII alphanumerics.
pub fn compute_const_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut prev: Option<char> = None;
    let mut separated = false;

    for c in value.chars() {
        if !c.is_ascii_alphanumeric() {
            separated = prev.is_some();
            continue;
        }
        let boundary = match prev {
            None => c.is_ascii_digit(),
            Some(p) => {
                separated
                    || (c.is_ascii_uppercase() && (p.is_ascii_lowercase() || p.is_ascii_digit()))
                    || (c.is_ascii_digit() && !p.is_ascii_digit())
            }
        };
        if boundary {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
        prev = Some(c);
        separated = false;
    }
    out
}

/// Literal value to constant identifier, ordered by literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantTable {
    entries: BTreeMap<String, String>,
}

impl ConstantTable {
    /// Builds identifiers `<NAME><suffix>` for each distinct value.
    ///
    /// Values whose name comes out empty are left out. Identifiers already in
    /// `taken` (or handed out earlier in this table) get `_2`, `_3`, ... added
    /// to the name, assigned in literal order. Every identifier handed out is
    /// added to `taken`.
    pub fn build<I, S>(values: I, suffix: &str, taken: &mut BTreeSet<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        let mut entries = BTreeMap::new();
        for value in values {
            let name = compute_const_name(&value);
            if name.is_empty() {
                continue;
            }
            let mut ident = format!("{name}{suffix}");
            let mut n = 2;
            while taken.contains(&ident) {
                ident = format!("{name}_{n}{suffix}");
                n += 1;
            }
            taken.insert(ident.clone());
            entries.insert(value, ident);
        }
        Self { entries }
    }

    pub fn get(&self, value: &str) -> Option<&str> {
        self.entries.get(value).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(v, n)| (v.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_splits_on_case_change() {
        assert_eq!(compute_const_name("userId"), "USER_ID");
        assert_eq!(compute_const_name("displayName"), "DISPLAY_NAME");
    }

    #[test]
    fn separators_collapse_to_one_boundary() {
        assert_eq!(compute_const_name("user_id"), "USER_ID");
        assert_eq!(compute_const_name("user--id"), "USER_ID");
        assert_eq!(compute_const_name("/{id}/items"), "ID_ITEMS");
    }

    #[test]
    fn leading_digit_gets_a_boundary() {
        assert_eq!(compute_const_name("2fa_code"), "_2FA_CODE");
        assert_eq!(compute_const_name("-2fa"), "_2FA");
    }

    #[test]
    fn digits_after_letters_start_a_new_word() {
        assert_eq!(compute_const_name("v2"), "V_2");
        assert_eq!(compute_const_name("sha256Sum"), "SHA_256_SUM");
    }

    #[test]
    fn no_trailing_or_leading_separator() {
        assert_eq!(compute_const_name("_id_"), "ID");
        assert_eq!(compute_const_name("ids/"), "IDS");
    }

    #[test]
    fn punctuation_only_yields_empty() {
        assert_eq!(compute_const_name("---"), "");
        assert_eq!(compute_const_name(""), "");
    }

    #[test]
    fn table_drops_empty_names_and_sorts() {
        let mut taken = BTreeSet::new();
        let table = ConstantTable::build(["zeta", "---", "alpha"], "", &mut taken);

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("alpha", "ALPHA"), ("zeta", "ZETA")]);
        assert_eq!(table.get("---"), None);
    }

    #[test]
    fn table_disambiguates_collisions() {
        let mut taken = BTreeSet::new();
        let table = ConstantTable::build(["user_id", "userId", "user-id"], "", &mut taken);

        assert_eq!(table.get("user-id"), Some("USER_ID"));
        assert_eq!(table.get("userId"), Some("USER_ID_2"));
        assert_eq!(table.get("user_id"), Some("USER_ID_3"));
    }

    #[test]
    fn table_respects_reserved_identifiers() {
        let mut taken = BTreeSet::from(["ROOT_PATH".to_string()]);
        let table = ConstantTable::build(["/root"], "_PATH", &mut taken);

        assert_eq!(table.get("/root"), Some("ROOT_2_PATH"));
        assert!(taken.contains("ROOT_2_PATH"));
    }
}
