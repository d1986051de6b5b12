//! Rule text -> rule name mapping for one ruleset

use crate::types::RuleRow;
use regex::{NoExpand, Regex};
use std::collections::HashMap;

/// Ordered mapping from literal rule text to its canonical name.
///
/// A repeated rule text keeps the position of its first occurrence but takes
/// the name of its last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleNameMapping {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl RuleNameMapping {
    pub fn from_rows(rows: &[RuleRow]) -> Self {
        let mut mapping = Self::default();
        for row in rows {
            mapping.insert(&row.rule, &row.rule_name);
        }
        mapping
    }

    pub fn insert(&mut self, rule: &str, rule_name: &str) {
        match self.positions.get(rule) {
            Some(&pos) => self.entries[pos].1 = rule_name.to_string(),
            None => {
                self.positions.insert(rule.to_string(), self.entries.len());
                self.entries.push((rule.to_string(), rule_name.to_string()));
            }
        }
    }

    pub fn get(&self, rule: &str) -> Option<&str> {
        self.positions
            .get(rule)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// (rule, rule name) pairs in mapping order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(rule, name)| (rule.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every whole-word occurrence of each rule text with its rule name.
    ///
    /// Pairs apply in mapping order, each over the output of the previous one.
    /// Rule text is matched literally and the name is inserted literally.
    pub fn normalize(&self, text: &str) -> Result<String, regex::Error> {
        let mut out = text.to_string();
        for (rule, name) in self.iter() {
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(rule)))?;
            out = pattern.replace_all(&out, NoExpand(name)).into_owned();
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> RuleNameMapping {
        let mut m = RuleNameMapping::default();
        for (rule, name) in pairs {
            m.insert(rule, name);
        }
        m
    }

    #[test]
    fn test_last_write_wins_keeps_first_position() {
        let m = mapping(&[("a", "A1"), ("b", "B"), ("a", "A2")]);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("a"), Some("A2"));
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![("a", "A2"), ("b", "B")]);
    }

    #[test]
    fn test_normalize_whole_words_only() {
        let m = mapping(&[("slang", "NoSlang")]);
        let out = m.normalize("slang, slangy and unslang; slang.").unwrap();
        assert_eq!(out, "NoSlang, slangy and unslang; NoSlang.");
    }

    #[test]
    fn test_normalize_escapes_metacharacters() {
        let m = mapping(&[("cost $5", "Price"), ("a.b", "Dot")]);
        let out = m.normalize("cost $5 or cost 5; axb or a.b").unwrap();
        assert_eq!(out, "Price or cost 5; axb or Dot");
    }

    #[test]
    fn test_normalize_inserts_name_literally() {
        let m = mapping(&[("use euro", "$1Euro")]);
        assert_eq!(m.normalize("rule: use euro").unwrap(), "rule: $1Euro");
    }

    #[test]
    fn test_normalize_report_line() {
        let m = mapping(&[("no slang", "NoSlang"), ("no slang", "NoSlang")]);
        let out = m
            .normalize("Non-Compliant. (1) Rule Name: no slang. Explanation: casual tone.")
            .unwrap();
        assert_eq!(out, "Non-Compliant. (1) Rule Name: NoSlang. Explanation: casual tone.");
    }

    #[test]
    fn test_later_pairs_see_earlier_output() {
        let m = mapping(&[("first rule", "second"), ("second", "Final")]);
        assert_eq!(m.normalize("first rule").unwrap(), "Final");
    }
}
