use adapt_forms::{format_phone, FieldType, FormField};

/// Separator used when a multi-choice field is flattened into one value.
pub const CHOICE_SEPARATOR: &str = ", ";

/// Value after typing `c` into `field`, or `None` when the field ignores it.
pub fn append_char(field: &FormField, current: &str, c: char) -> Option<String> {
    match field.field_type {
        FieldType::Text | FieldType::Email | FieldType::Textarea => Some(format!("{current}{c}")),
        FieldType::Phone => {
            if !(c.is_ascii_digit() || "+-(). ".contains(c)) {
                return None;
            }
            let typed = format!("{current}{c}");
            Some(if is_international(&typed) {
                typed
            } else {
                format_phone(&typed)
            })
        }
        FieldType::Number => {
            (c.is_ascii_digit() || (c == '.' && !current.contains('.')) || (c == '-' && current.is_empty()))
                .then(|| format!("{current}{c}"))
        }
        FieldType::Date => (c.is_ascii_digit() || c == '-').then(|| format!("{current}{c}")),
        FieldType::Select | FieldType::Checkbox | FieldType::Multiselect => None,
    }
}

/// Value after deleting the last typed character.
pub fn backspace(field: &FormField, current: &str) -> String {
    match field.field_type {
        FieldType::Phone if !is_international(current) => {
            let mut digits: String = current.chars().filter(char::is_ascii_digit).collect();
            digits.pop();
            format_phone(&digits)
        }
        FieldType::Select | FieldType::Checkbox | FieldType::Multiselect => current.to_string(),
        _ => {
            let mut value = current.to_string();
            value.pop();
            value
        }
    }
}

/// Moves a single-choice field to the next (or previous) option.
pub fn cycle_option(field: &FormField, current: &str, forward: bool) -> String {
    let options = field.option_list();
    if options.is_empty() {
        return current.to_string();
    }
    let next = match options.iter().position(|option| option == current) {
        Some(index) if forward => (index + 1) % options.len(),
        Some(index) => (index + options.len() - 1) % options.len(),
        None if forward => 0,
        None => options.len() - 1,
    };
    options[next].clone()
}

/// Flips a toggle checkbox, or adds/removes `option` from a multi-choice value.
pub fn toggle(field: &FormField, current: &str, option: Option<&str>) -> String {
    if field.is_toggle() {
        return if current == "true" { "false" } else { "true" }.to_string();
    }
    let Some(option) = option else {
        return current.to_string();
    };
    let mut chosen = selected_options(current);
    if let Some(index) = chosen.iter().position(|existing| existing == option) {
        chosen.remove(index);
    } else {
        chosen.push(option.to_string());
    }
    // Keep declaration order so the stored value does not depend on click order.
    let ordered: Vec<&str> = field
        .option_list()
        .iter()
        .map(String::as_str)
        .filter(|candidate| chosen.iter().any(|c| c == candidate))
        .collect();
    ordered.join(CHOICE_SEPARATOR)
}

pub fn selected_options(value: &str) -> Vec<String> {
    value
        .split(CHOICE_SEPARATOR.trim())
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn is_international(value: &str) -> bool {
    value.trim_start().starts_with('+')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn phone_input_is_grouped_as_typed() {
        let field = FormField::new("phone", FieldType::Phone, "Phone");
        let mut value = String::new();
        for c in "5551234567".chars() {
            value = append_char(&field, &value, c).unwrap();
        }
        assert_eq!(value, "(555) 123-4567");
        assert_eq!(backspace(&field, &value), "(555) 123-456");
        assert_eq!(append_char(&field, &value, 'x'), None);
    }

    #[test]
    fn international_numbers_are_left_alone() {
        let field = FormField::new("phone", FieldType::Phone, "Phone");
        let value = append_char(&field, "+44 20", '7').unwrap();
        assert_eq!(value, "+44 207");
    }

    #[test]
    fn number_fields_take_one_decimal_point() {
        let field = FormField::new("age", FieldType::Number, "Age");
        assert_eq!(append_char(&field, "", '-'), Some("-".to_string()));
        assert_eq!(append_char(&field, "1.5", '.'), None);
        assert_eq!(append_char(&field, "12", 'a'), None);
    }

    #[test]
    fn select_wraps_in_both_directions() {
        let field = FormField::new("subject", FieldType::Select, "Subject").options(&["A", "B"]);
        assert_eq!(cycle_option(&field, "", true), "A");
        assert_eq!(cycle_option(&field, "B", true), "A");
        assert_eq!(cycle_option(&field, "", false), "B");
    }

    #[test]
    fn multiselect_keeps_declaration_order() {
        let field =
            FormField::new("days", FieldType::Multiselect, "Days").options(&["Mon", "Wed", "Fri"]);
        let value = toggle(&field, "", Some("Fri"));
        let value = toggle(&field, &value, Some("Mon"));
        assert_eq!(value, "Mon, Fri");
        assert_eq!(toggle(&field, &value, Some("Fri")), "Mon");
    }

    #[test]
    fn plain_checkbox_flips() {
        let field = FormField::new("waiver", FieldType::Checkbox, "Waiver");
        assert_eq!(toggle(&field, "false", None), "true");
        assert_eq!(toggle(&field, "true", None), "false");
    }
}
