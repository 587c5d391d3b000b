//! Plain-text rendering of the message stream.

use combat_core::{CombatEngine, CombatMessage, EntityView, MessageTag, Team};
use console::style;

pub fn message(message: &CombatMessage) -> String {
    let label = format!("{:<11}", message.tag.as_ref());
    let label = match message.tag {
        MessageTag::Damage => style(label).red(),
        MessageTag::Effect => style(label).magenta(),
        MessageTag::Positioning => style(label).cyan(),
        MessageTag::Probability => style(label).dim(),
        MessageTag::Dialogue => style(label).green(),
        MessageTag::Turn => style(label).bold(),
        MessageTag::Resource => style(label).blue(),
        MessageTag::Status => style(label).yellow(),
    };
    format!("{:>8.1} {} {}", message.clock, label, message.text)
}

pub fn entity(view: &EntityView) -> String {
    let mut line = format!(
        "  {:<16} HP {:>4}/{:<4} MP {:>3}/{:<3}",
        view.name, view.hp, view.max_hp, view.mp, view.max_mp
    );
    if !view.statuses.is_empty() {
        let statuses: Vec<&str> = view.statuses.iter().map(|s| s.as_ref()).collect();
        line.push_str(&format!(" [{}]", statuses.join(", ")));
    }
    if let Some(enchantment) = &view.enchantment {
        line.push_str(&format!(" <{enchantment}>"));
    }
    if view.hp == 0 {
        return style(line).dim().to_string();
    }
    line
}

pub fn roster(engine: &CombatEngine) -> Vec<String> {
    let mut lines = Vec::new();
    for team in [Team::Players, Team::Opponents] {
        lines.push(style(team.as_ref()).bold().underlined().to_string());
        lines.extend(
            engine
                .ids()
                .filter(|&id| engine.team_of(id) == team)
                .map(|id| entity(&engine.view(id))),
        );
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::EntityId;

    #[test]
    fn message_line_carries_clock_tag_and_text() {
        console::set_colors_enabled(false);
        let line = message(&CombatMessage {
            seq: 0,
            clock: 12.5,
            tag: MessageTag::Damage,
            text: "Knight hits Goblin for 9 damage.".into(),
        });
        assert_eq!(line, "    12.5 damage      Knight hits Goblin for 9 damage.");
    }

    #[test]
    fn entity_line_lists_statuses() {
        console::set_colors_enabled(false);
        let view = EntityView {
            id: EntityId(0),
            name: "Wolf".into(),
            team: Team::Opponents,
            hp: 30,
            max_hp: 70,
            mp: 0,
            max_mp: 0,
            action_timer: 0.0,
            statuses: vec![combat_core::StatusKind::Poison],
            enchantment: None,
            defending: false,
        };
        assert!(entity(&view).ends_with("[poison]"));
    }
}
