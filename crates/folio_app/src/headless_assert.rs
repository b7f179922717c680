//! Assertion helpers for headless scenarios.

use folio_layout::CardPose;
use folio_theme::ColorScheme;
use std::collections::HashMap;

/// Snapshot of app-observable state used for headless assertions.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSnapshot {
    /// Elements keyed by their `id` attribute
    pub elements: HashMap<String, DiagnosticsElement>,
    pub theme: Option<ColorScheme>,
    /// Dismissed deck indices, ascending
    pub dismissed: Vec<usize>,
    /// Element ids of revealed sections
    pub revealed: Vec<String>,
    /// Current pose per deck index
    pub cards: Vec<CardPose>,
}

/// Minimal element representation for diagnostics checks.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsElement {
    pub text: Option<String>,
    pub classes: Vec<String>,
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

fn failed(code: &str, message: String) -> AssertionResult {
    AssertionResult::Failed {
        code: code.to_string(),
        message,
    }
}

pub fn evaluate_assert_exists(id: &str, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    if snapshot.elements.contains_key(id) {
        AssertionResult::Passed
    } else {
        failed("missing_element", format!("{id}: element not found"))
    }
}

pub fn evaluate_assert_text_contains(
    id: &str,
    expected: &str,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    let Some(element) = snapshot.elements.get(id) else {
        return failed("missing_element", format!("{id}: element not found"));
    };
    let Some(text) = element.text.as_deref() else {
        return failed("missing_text", format!("{id}: text not available"));
    };
    if text.contains(expected) {
        AssertionResult::Passed
    } else {
        failed(
            "text_mismatch",
            format!("{id}: expected substring '{expected}', got '{text}'"),
        )
    }
}

/// `count` cards dismissed, and `cards` among them when given
pub fn evaluate_assert_dismissed(
    count: Option<usize>,
    cards: Option<&[usize]>,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    if let Some(count) = count {
        if snapshot.dismissed.len() != count {
            return failed(
                "dismissed_mismatch",
                format!(
                    "expected {count} dismissed cards, got {:?}",
                    snapshot.dismissed
                ),
            );
        }
    }
    if let Some(cards) = cards {
        if let Some(missing) = cards.iter().find(|c| !snapshot.dismissed.contains(*c)) {
            return failed(
                "dismissed_mismatch",
                format!("card {missing} not dismissed, got {:?}", snapshot.dismissed),
            );
        }
    }
    AssertionResult::Passed
}

pub fn evaluate_assert_theme(expected: ColorScheme, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    match snapshot.theme {
        Some(theme) if theme == expected => AssertionResult::Passed,
        Some(theme) => failed("theme_mismatch", format!("expected {expected}, got {theme}")),
        None => failed("missing_theme", "theme not available".to_string()),
    }
}

pub fn evaluate_assert_revealed(
    section: &str,
    expected: bool,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    if !snapshot.elements.contains_key(section) {
        return failed("missing_element", format!("{section}: element not found"));
    }
    let revealed = snapshot.revealed.iter().any(|s| s == section);
    if revealed == expected {
        AssertionResult::Passed
    } else if expected {
        failed("not_revealed", format!("{section}: not revealed"))
    } else {
        failed("unexpected_reveal", format!("{section}: already revealed"))
    }
}

/// Card pose within `tolerance` of the given components
pub fn evaluate_assert_card_near(
    card: usize,
    expected: ExpectedPose,
    tolerance: f32,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    let Some(pose) = snapshot.cards.get(card) else {
        return failed("missing_card", format!("card {card}: not in deck"));
    };
    let checks = [
        ("x", expected.x, pose.x),
        ("y", expected.y, pose.y),
        ("rot", expected.rot, pose.rot),
        ("scale", expected.scale, pose.scale),
    ];
    for (name, want, got) in checks {
        if let Some(want) = want {
            if (want - got).abs() > tolerance {
                return failed(
                    "pose_mismatch",
                    format!("card {card}: expected {name} {want} +/- {tolerance}, got {got}"),
                );
            }
        }
    }
    AssertionResult::Passed
}

/// Pose components to compare; `None` skips the component
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpectedPose {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub rot: Option<f32>,
    pub scale: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DiagnosticsSnapshot {
        let mut elements = HashMap::new();
        elements.insert(
            "work".to_string(),
            DiagnosticsElement {
                text: Some("What I Do".to_string()),
                classes: vec!["is-visible".to_string()],
            },
        );
        elements.insert("tech".to_string(), DiagnosticsElement::default());
        DiagnosticsSnapshot {
            elements,
            theme: Some(ColorScheme::Dark),
            dismissed: vec![1, 3],
            revealed: vec!["work".to_string()],
            cards: vec![CardPose::default(); 4],
        }
    }

    #[test]
    fn test_text_assertions() {
        let snap = snapshot();
        assert_eq!(evaluate_assert_text_contains("work", "I Do", &snap), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_text_contains("tech", "x", &snap),
            AssertionResult::Failed { code, .. } if code == "missing_text"
        ));
        assert!(matches!(
            evaluate_assert_exists("footer", &snap),
            AssertionResult::Failed { code, .. } if code == "missing_element"
        ));
    }

    #[test]
    fn test_dismissed_assertions() {
        let snap = snapshot();
        assert_eq!(evaluate_assert_dismissed(Some(2), Some(&[3]), &snap), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_dismissed(Some(4), None, &snap),
            AssertionResult::Failed { code, .. } if code == "dismissed_mismatch"
        ));
        assert!(matches!(
            evaluate_assert_dismissed(None, Some(&[0]), &snap),
            AssertionResult::Failed { .. }
        ));
    }

    #[test]
    fn test_theme_and_reveal_assertions() {
        let snap = snapshot();
        assert_eq!(evaluate_assert_theme(ColorScheme::Dark, &snap), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_theme(ColorScheme::Light, &snap),
            AssertionResult::Failed { code, .. } if code == "theme_mismatch"
        ));
        assert_eq!(evaluate_assert_revealed("work", true, &snap), AssertionResult::Passed);
        assert_eq!(evaluate_assert_revealed("tech", false, &snap), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_revealed("tech", true, &snap),
            AssertionResult::Failed { code, .. } if code == "not_revealed"
        ));
    }

    #[test]
    fn test_card_near_skips_unset_components() {
        let snap = snapshot();
        let expected = ExpectedPose {
            x: Some(0.4),
            scale: Some(1.0),
            ..ExpectedPose::default()
        };
        assert_eq!(evaluate_assert_card_near(0, expected, 0.5, &snap), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_card_near(0, expected, 0.1, &snap),
            AssertionResult::Failed { code, .. } if code == "pose_mismatch"
        ));
        assert!(matches!(
            evaluate_assert_card_near(9, expected, 1.0, &snap),
            AssertionResult::Failed { code, .. } if code == "missing_card"
        ));
    }
}
