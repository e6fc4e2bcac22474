//! Alignment guides shown while an element is dragged.
//!
//! Guides are advisory: nothing here accepts, rejects or moves a placement.

use shared::{Container, Element, ElementId, Guide, GuideAxis, GuideKind};

/// Guides for `id` placed at `position`.
///
/// Emits a guide for every wall, the floor and every sibling coordinate that
/// lies within `threshold` of the candidate on the same axis. Unknown ids
/// yield no guides.
pub fn alignment_guides(
    container: &Container,
    elements: &[Element],
    id: ElementId,
    position: [f64; 3],
    threshold: f64,
) -> Vec<Guide> {
    let Some(element) = elements.iter().find(|e| e.id == id) else {
        return Vec::new();
    };

    let half = element.scaled_size().map(|s| s / 2.0);
    let near = |axis: GuideAxis, value: f64| (position[axis.index()] - value).abs() < threshold;

    let mut guides = Vec::new();
    let mut push = |axis: GuideAxis, value: f64, kind: GuideKind| {
        if near(axis, value) {
            guides.push(Guide { axis, value, kind });
        }
    };

    let hl = container.half_length();
    let hw = container.half_width();
    push(GuideAxis::X, hl - half[0], GuideKind::Wall);
    push(GuideAxis::X, -hl + half[0], GuideKind::Wall);
    push(GuideAxis::Z, hw - half[2], GuideKind::Wall);
    push(GuideAxis::Z, -hw + half[2], GuideKind::Wall);
    push(GuideAxis::Y, half[1], GuideKind::Floor);

    for other in elements.iter().filter(|e| e.id != id) {
        for axis in GuideAxis::ALL {
            push(axis, other.position[axis.index()], GuideKind::Element);
        }
    }

    guides
}
