/// Procedural background stars.
///
/// Only the shell parameters live in the graph; the renderer expands them
/// into instances.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Starfield {
    pub count: u32,
    /// Inner radius of the star shell.
    pub radius: f64,
    /// Shell thickness beyond `radius`.
    pub depth: f64,
    /// Point size multiplier.
    pub size_factor: f64,
    /// 0 = white stars.
    pub saturation: f64,
}
