pub mod catalog;
pub mod timetable;

/// Title-case a label the way the display layer wants it: first letter of
/// each alphabetic run uppercased, the rest lowercased ("first year" →
/// "First Year", "n/a" → "N/A").
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(c);
            at_boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::title_case;

    #[test]
    fn title_cases_each_word() {
        assert_eq!(title_case("first year"), "First Year");
        assert_eq!(title_case("SCIENCE block"), "Science Block");
        assert_eq!(title_case("n/a"), "N/A");
        assert_eq!(title_case(""), "");
    }
}
