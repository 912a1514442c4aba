//! Human-readable rendering of tool results

use crate::models::{Card, Color, Set};
use std::collections::BTreeSet;

/// Numbered card listing under a header line
pub fn card_list(header: &str, cards: &[Card]) -> String {
    let mut lines = vec![format!("{}\n", header)];

    for (i, card) in cards.iter().enumerate() {
        lines.push(format!("{}. **{}**", i + 1, card.name));
        push_opt(&mut lines, "   Mana Cost", card.mana_cost.as_deref());
        push_opt(&mut lines, "   Type", card.type_line.as_deref());
        push_opt(&mut lines, "   Colors", color_names(&card.colors).as_deref());
        push_opt(&mut lines, "   Power/Toughness", card.power_toughness().as_deref());
        push_opt(&mut lines, "   Loyalty", card.loyalty.as_deref());
        push_opt(&mut lines, "   Text", card.rules_text.as_deref());
        push_opt(&mut lines, "   Set", card.set_label().as_deref());
        push_opt(&mut lines, "   Rarity", card.rarity.as_deref());
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

/// Every populated field of one card
pub fn card_detail(card: &Card) -> String {
    let mut lines = vec![format!("**{}**\n", card.name), format!("ID: {}", card.id)];

    push_opt(&mut lines, "Mana Cost", card.mana_cost.as_deref());
    push_opt(
        &mut lines,
        "Converted Mana Cost",
        card.converted_mana_cost.map(|cmc| cmc.to_string()).as_deref(),
    );
    push_opt(&mut lines, "Colors", color_names(&card.colors).as_deref());
    push_opt(&mut lines, "Color Identity", color_codes(&card.color_identity).as_deref());
    push_opt(&mut lines, "Type", card.type_line.as_deref());
    push_opt(&mut lines, "Supertypes", joined(&card.supertypes).as_deref());
    push_opt(&mut lines, "Types", joined(&card.types).as_deref());
    push_opt(&mut lines, "Subtypes", joined(&card.subtypes).as_deref());
    push_opt(&mut lines, "Power/Toughness", card.power_toughness().as_deref());
    push_opt(&mut lines, "Loyalty", card.loyalty.as_deref());
    push_opt(&mut lines, "Text", card.rules_text.as_deref());
    push_opt(&mut lines, "Set", card.set_label().as_deref());
    push_opt(&mut lines, "Rarity", card.rarity.as_deref());
    push_opt(&mut lines, "Image URL", card.image_url.as_deref());

    lines.join("\n")
}

/// Numbered set listing under a header line
pub fn set_list(header: &str, sets: &[Set]) -> String {
    let mut lines = vec![format!("{}\n", header)];

    for (i, set) in sets.iter().enumerate() {
        lines.push(format!("{}. **{}** ({})", i + 1, set.name, set.code));
        push_opt(&mut lines, "   Type", set.set_type.as_deref());
        push_opt(&mut lines, "   Released", set.release_date.as_deref());
        push_opt(&mut lines, "   Block", set.block.as_deref());
        push_opt(
            &mut lines,
            "   Cards",
            set.card_count.map(|count| count.to_string()).as_deref(),
        );
        if set.online_only {
            lines.push("   Online only: yes".to_string());
        }
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

fn push_opt(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        lines.push(format!("{}: {}", label, value));
    }
}

fn color_names(colors: &BTreeSet<Color>) -> Option<String> {
    (!colors.is_empty()).then(|| colors.iter().map(Color::name).collect::<Vec<_>>().join(", "))
}

fn color_codes(colors: &BTreeSet<Color>) -> Option<String> {
    (!colors.is_empty()).then(|| colors.iter().map(Color::code).collect::<Vec<_>>().join(", "))
}

fn joined(values: &[String]) -> Option<String> {
    (!values.is_empty()).then(|| values.join(", "))
}
