//! Display helper functions for elements

use shared::Element;

use crate::placement::Zone;

/// Get display name for an element
pub fn element_display_name(element: &Element) -> String {
    format!("{} - {}", element.kind, element.material)
}

/// Zone label for an element type
pub fn zone_label(kind: &str) -> &'static str {
    match Zone::classify(kind) {
        Zone::Entrance => "Entrance",
        Zone::Sleeping => "Sleeping",
        Zone::Dining => "Dining",
        Zone::Bathroom => "Bathroom",
        Zone::Kitchen => "Kitchen",
        Zone::Living => "Living",
        Zone::Utilities => "Utilities",
        Zone::Appliances => "Appliances",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::element_at;

    #[test]
    fn test_display_name() {
        let mut bed = element_at(1, "bed", [0.0; 3], [2.0, 0.5, 1.5]);
        bed.material = "fabric".to_string();
        assert_eq!(element_display_name(&bed), "bed - fabric");
    }

    #[test]
    fn test_zone_label() {
        assert_eq!(zone_label("fridge"), "Appliances");
        assert_eq!(zone_label("beanbag"), "Living");
    }
}
