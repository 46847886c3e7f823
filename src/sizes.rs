use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Largest width or height a preset may have.
pub const MAX_DIMENSION: u32 = 16384;

pub const PRESETS: [WindowSize; 4] = [
    WindowSize::new(640, 360),
    WindowSize::new(852, 480),
    WindowSize::new(1280, 720),
    WindowSize::new(1920, 1080),
];

/// What the window has to do after a size command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SizeRequest {
    Windowed(WindowSize),
    Fullscreen(WindowSize),
}

/// Cycles through an ordered table of window sizes.
///
/// The selected index is kept while fullscreen, so leaving fullscreen
/// restores it. Fullscreen always uses the last (largest) preset.
#[derive(Debug, Clone)]
pub struct WindowSizes {
    presets: Vec<WindowSize>,
    current: usize,
    fullscreen: bool,
}

impl WindowSizes {
    /// Returns `None` for an empty table.
    pub fn new(presets: Vec<WindowSize>) -> Option<Self> {
        if presets.is_empty() {
            return None;
        }

        Some(Self {
            presets,
            current: 0,
            fullscreen: false,
        })
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn current(&self) -> WindowSize {
        self.presets[self.current]
    }

    pub fn largest(&self) -> WindowSize {
        self.presets[self.presets.len() - 1]
    }

    /// Size the window should have right now.
    pub fn active(&self) -> WindowSize {
        if self.fullscreen {
            self.largest()
        } else {
            self.current()
        }
    }

    pub fn grow(&mut self) -> Option<SizeRequest> {
        if self.current + 1 >= self.presets.len() {
            return None;
        }

        self.current += 1;
        self.windowed_change()
    }

    pub fn shrink(&mut self) -> Option<SizeRequest> {
        if self.current == 0 {
            return None;
        }

        self.current -= 1;
        self.windowed_change()
    }

    pub fn toggle_fullscreen(&mut self) -> SizeRequest {
        self.fullscreen = !self.fullscreen;

        if self.fullscreen {
            SizeRequest::Fullscreen(self.largest())
        } else {
            SizeRequest::Windowed(self.current())
        }
    }

    // selection changes while fullscreen only take effect on leaving it
    fn windowed_change(&self) -> Option<SizeRequest> {
        if self.fullscreen {
            None
        } else {
            Some(SizeRequest::Windowed(self.current()))
        }
    }
}

impl Default for WindowSizes {
    fn default() -> Self {
        Self {
            presets: PRESETS.to_vec(),
            current: 0,
            fullscreen: false,
        }
    }
}

/// Top left corner that centres `window` inside a monitor area.
pub fn centred(origin: (i32, i32), area: WindowSize, window: WindowSize) -> (i32, i32) {
    let axis = |origin: i32, area: u32, window: u32| {
        let pos = origin as i64 + (area as i64 - window as i64) / 2;
        pos.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    };

    (
        axis(origin.0, area.width, window.width),
        axis(origin.1, area.height, window.height),
    )
}

/// First mode whose size equals `target`.
pub fn matching_mode<M>(
    modes: impl IntoIterator<Item = M>,
    target: WindowSize,
    size_of: impl Fn(&M) -> WindowSize,
) -> Option<M> {
    modes.into_iter().find(|mode| size_of(mode) == target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_is_rejected() {
        assert!(WindowSizes::new(Vec::new()).is_none());
    }

    #[test]
    fn starts_at_smallest_preset() {
        let sizes = WindowSizes::default();

        assert_eq!(sizes.index(), 0);
        assert_eq!(sizes.current(), WindowSize::new(640, 360));
        assert_eq!(sizes.largest(), WindowSize::new(1920, 1080));
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut sizes = WindowSizes::default();

        for _ in 0..10 {
            sizes.shrink();
            assert!(sizes.index() < PRESETS.len());
        }
        assert_eq!(sizes.index(), 0);

        for _ in 0..10 {
            sizes.grow();
            assert!(sizes.index() < PRESETS.len());
        }
        assert_eq!(sizes.index(), 3);

        for _ in 0..2 {
            sizes.shrink();
        }
        assert_eq!(sizes.index(), 1);
    }

    #[test]
    fn only_changes_are_requested() {
        let mut sizes = WindowSizes::default();

        assert_eq!(sizes.shrink(), None);
        assert_eq!(
            sizes.grow(),
            Some(SizeRequest::Windowed(WindowSize::new(852, 480)))
        );
        assert_eq!(sizes.grow(), Some(SizeRequest::Windowed(PRESETS[2])));
        assert_eq!(sizes.grow(), Some(SizeRequest::Windowed(PRESETS[3])));
        assert_eq!(sizes.grow(), None);
    }

    #[test]
    fn fullscreen_round_trip_restores_selection() {
        for start in 0..PRESETS.len() {
            let mut sizes = WindowSizes::default();
            for _ in 0..start {
                sizes.grow();
            }

            assert_eq!(
                sizes.toggle_fullscreen(),
                SizeRequest::Fullscreen(PRESETS[3])
            );
            assert!(sizes.is_fullscreen());
            assert_eq!(sizes.active(), PRESETS[3]);

            assert_eq!(
                sizes.toggle_fullscreen(),
                SizeRequest::Windowed(PRESETS[start])
            );
            assert_eq!(sizes.index(), start);
            assert_eq!(sizes.active(), PRESETS[start]);
        }
    }

    #[test]
    fn selection_while_fullscreen_is_deferred() {
        let mut sizes = WindowSizes::default();
        sizes.toggle_fullscreen();

        assert_eq!(sizes.grow(), None);
        assert_eq!(sizes.index(), 1);
        assert_eq!(sizes.active(), PRESETS[3]);

        assert_eq!(
            sizes.toggle_fullscreen(),
            SizeRequest::Windowed(PRESETS[1])
        );
    }

    #[test]
    fn centring() {
        let area = WindowSize::new(1920, 1080);

        assert_eq!(centred((0, 0), area, PRESETS[0]), (640, 360));
        assert_eq!(centred((1920, 0), area, PRESETS[3]), (1920, 0));
        assert_eq!(centred((0, 0), PRESETS[0], area), (-640, -360));
    }

    #[test]
    fn centring_huge_windows_does_not_wrap() {
        let area = WindowSize::new(1920, 1080);
        let huge = WindowSize::new(3_000_000_000, 100);

        let (x, y) = centred((0, 0), area, huge);

        assert_eq!(x, -1_499_999_040);
        assert_eq!(y, 490);
        assert_eq!(centred((10, 0), WindowSize::new(u32::MAX, 0), WindowSize::new(0, 0)).0, i32::MAX);
    }

    #[test]
    fn picks_mode_of_requested_size() {
        let modes = [(1280, 720, 60), (1920, 1080, 60), (1920, 1080, 144)];
        let size_of = |m: &(u32, u32, u32)| WindowSize::new(m.0, m.1);

        assert_eq!(
            matching_mode(modes, PRESETS[3], size_of),
            Some((1920, 1080, 60))
        );
        assert_eq!(matching_mode(modes, PRESETS[0], size_of), None);
    }
}
