use mapty_protocol::{Bounds, Coords, MarkerIcon};

/// The map the workouts are drawn on.
///
/// Handles are opaque to the core: it stores them in the
/// [`MarkerRegistry`](crate::registry::MarkerRegistry) and hands them back
/// for removal, nothing more.
pub trait MapSurface {
    type Handle;

    fn create_marker(&mut self, coords: Coords, icon: MarkerIcon, label: &str) -> Self::Handle;

    fn remove_marker(&mut self, handle: Self::Handle);

    fn fit_bounds(&mut self, bounds: Bounds);

    fn pan_to(&mut self, coords: Coords);
}
