//! Pointer hit testing against the buttons of a PCI snapshot.

use crate::pci::PciSnapshot;

/// Initial "best distance"; larger than any squared distance inside a
/// 1024x1024 coordinate space.
const NO_HIT_DISTANCE: i32 = 0x0800_0000;

/// Find the button under a point.
///
/// Every button whose inclusive box contains the point is a candidate; the
/// candidate whose centre is closest (squared Euclidean distance) wins, and
/// on equal distance the lowest index wins. Returns the 1-based button index,
/// or `None` when no button contains the point.
pub fn find_button(snapshot: &PciSnapshot, x: i32, y: i32) -> Option<u8> {
    let (Ok(ux), Ok(uy)) = (u32::try_from(x), u32::try_from(y)) else {
        return None;
    };

    let mut best = None;
    let mut best_distance = NO_HIT_DISTANCE;

    for button in &snapshot.buttons {
        if !button.geometry.contains(ux, uy) {
            continue;
        }

        let (cx, cy) = button.geometry.center();
        let (dx, dy) = (cx - x, cy - y);
        let distance = dx * dx + dy * dy;

        if distance < best_distance {
            best_distance = distance;
            best = Some(button.index);
        }
    }

    best
}
