//! The level catalogue as data: six levels of four screens, each with its
//! metadata, spawn point, scripted entry placements and periodic wave rules.

use serde::{Deserialize, Serialize};

use crate::level::spawning::{Altitude, SpawnKind, SpawnRule};

pub const LEVEL_COUNT: u8 = 6;
pub const SCREENS_PER_LEVEL: u8 = 4;

/// Pacing role of a screen inside its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenType {
    Introduction,
    Practice,
    Mastery,
    Challenge,
}

impl ScreenType {
    /// Screens run introduction, practice, mastery, challenge in every level.
    pub fn for_index(screen: u8) -> Self {
        match screen {
            0 => ScreenType::Introduction,
            1 => ScreenType::Practice,
            2 => ScreenType::Mastery,
            _ => ScreenType::Challenge,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScreenType::Introduction => "introduction",
            ScreenType::Practice => "practice",
            ScreenType::Mastery => "mastery",
            ScreenType::Challenge => "challenge",
        }
    }
}

/// One scripted placement made when a screen is entered. Heights are given
/// as `rise` above the ground line so the table is independent of `ground_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Stationary ledge whose top sits `rise` above the ground.
    Platform { x: f32, rise: f32, w: f32 },
    Enemy { x: f32, speed: f32 },
    WhiteEnemy { x: f32, speed: f32 },
    /// Flying enemy whose top sits `rise` above the ground.
    FlyingEnemy { x: f32, rise: f32, speed: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ScreenType,
    pub spawn_x: f32,
    /// Player top edge, measured up from the ground line.
    pub spawn_rise: f32,
    pub placements: Vec<Placement>,
    pub waves: Vec<SpawnRule>,
}

impl ScreenConfig {
    pub fn spawn_point(&self, ground_y: f32) -> (f32, f32) {
        (self.spawn_x, ground_y - self.spawn_rise)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
    pub name: &'static str,
    pub theme: &'static str,
    pub screens: Vec<ScreenConfig>,
}

/// Every level of the game, indexed by 1-based level and 0-based screen.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

struct ScreenMeta {
    name: &'static str,
    description: &'static str,
    spawn_x: f32,
    spawn_rise: f32,
}

const fn meta(name: &'static str, description: &'static str, spawn_x: f32, spawn_rise: f32) -> ScreenMeta {
    ScreenMeta {
        name,
        description,
        spawn_x,
        spawn_rise,
    }
}

static CATALOGUE: [(&str, &str, [ScreenMeta; 4]); 6] = [
    ("Tutorial", "Learning the basics", [
        meta("Platforms", "Learn basic platforming", 150.0, 195.0),
        meta("Yellow Enemies", "Practice with ground enemies", 120.0, 175.0),
        meta("Blue Enemies", "Master flying enemies", 100.0, 185.0),
        meta("White Enemies", "Combine all enemy types", 130.0, 195.0),
    ]),
    ("Beginner", "Platforming fundamentals", [
        meta("Gap Jumping", "Learn to jump between platforms", 140.0, 205.0),
        meta("Enemy Timing", "Time your jumps with enemies", 110.0, 215.0),
        meta("Mixed Threats", "Handle multiple enemy types", 160.0, 225.0),
        meta("Speed Challenge", "Quick reactions required", 125.0, 235.0),
    ]),
    ("Intermediate", "Precision and timing", [
        meta("Precision Jumps", "Small platforms require precision", 150.0, 245.0),
        meta("Enemy Waves", "Handle waves of enemies", 135.0, 255.0),
        meta("Aerial Combat", "Fight while airborne", 145.0, 265.0),
        meta("Chaos Control", "Control the chaos", 155.0, 275.0),
    ]),
    ("Advanced", "Complex challenges", [
        meta("Advanced Platforms", "Complex platforming sequences", 160.0, 285.0),
        meta("Enemy Swarms", "Handle large groups of enemies", 140.0, 295.0),
        meta("Precision Combat", "Fight with precision timing", 150.0, 305.0),
        meta("Ultimate Challenge", "The ultimate test of skill", 145.0, 315.0),
    ]),
    ("Expert", "Master level gameplay", [
        meta("Expert Platforms", "Expert-level platforming", 170.0, 325.0),
        meta("Elite Enemies", "Face elite enemy types", 155.0, 335.0),
        meta("Master Combat", "Master-level combat scenarios", 165.0, 345.0),
        meta("Legendary Challenge", "Legendary difficulty challenge", 160.0, 355.0),
    ]),
    ("Master", "Ultimate mastery", [
        meta("Master Platforms", "Master-level platforming", 180.0, 365.0),
        meta("Master Enemies", "Master-level enemy encounters", 170.0, 375.0),
        meta("Ultimate Combat", "Ultimate combat scenarios", 175.0, 385.0),
        meta("Final Challenge", "The final challenge", 165.0, 395.0),
    ]),
];

/// Tutorial screens have hand-placed ledges: (x, rise, width).
const TUTORIAL_LEDGES: [[(f32, f32, f32); 5]; 4] = [
    [(150.0, 120.0, 100.0), (350.0, 150.0, 80.0), (550.0, 180.0, 120.0), (750.0, 140.0, 90.0), (950.0, 160.0, 100.0)],
    [(120.0, 100.0, 80.0), (300.0, 130.0, 90.0), (500.0, 160.0, 100.0), (700.0, 140.0, 85.0), (900.0, 120.0, 95.0)],
    [(100.0, 110.0, 85.0), (280.0, 140.0, 95.0), (480.0, 170.0, 105.0), (680.0, 150.0, 90.0), (880.0, 130.0, 100.0)],
    [(130.0, 120.0, 90.0), (320.0, 150.0, 100.0), (520.0, 180.0, 110.0), (720.0, 160.0, 95.0), (920.0, 140.0, 105.0)],
];

/// Rise and width offsets of the five ledges on every later screen.
const STAIRCASE_RISE: [f32; 5] = [0.0, 30.0, 60.0, 40.0, 20.0];
const STAIRCASE_WIDTH: [f32; 5] = [0.0, 10.0, 20.0, 5.0, 15.0];
const STAIRCASE_SPACING: f32 = 200.0;

impl LevelTable {
    pub fn standard() -> Self {
        let levels = CATALOGUE
            .iter()
            .enumerate()
            .map(|(li, (name, theme, screens))| LevelConfig {
                name: *name,
                theme: *theme,
                screens: screens
                    .iter()
                    .enumerate()
                    .map(|(si, m)| {
                        let (level, screen) = (li as u8 + 1, si as u8);
                        ScreenConfig {
                            name: m.name,
                            description: m.description,
                            kind: ScreenType::for_index(screen),
                            spawn_x: m.spawn_x,
                            spawn_rise: m.spawn_rise,
                            placements: placements(level, screen, m.spawn_x),
                            waves: waves(level, screen),
                        }
                    })
                    .collect(),
            })
            .collect();
        Self { levels }
    }

    /// A table from explicit levels. Used to build partial catalogues.
    pub fn from_levels(levels: Vec<LevelConfig>) -> Self {
        Self { levels }
    }

    pub fn level_count(&self) -> u8 {
        self.levels.len() as u8
    }

    pub fn level(&self, level: u8) -> Option<&LevelConfig> {
        let idx = usize::from(level).checked_sub(1)?;
        self.levels.get(idx)
    }

    pub fn screen(&self, level: u8, screen: u8) -> Option<&ScreenConfig> {
        self.level(level)?.screens.get(usize::from(screen))
    }

    pub fn screen_count(&self, level: u8) -> u8 {
        self.level(level).map_or(0, |l| l.screens.len() as u8)
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn placements(level: u8, screen: u8, spawn_x: f32) -> Vec<Placement> {
    let mut out: Vec<Placement> = if level == 1 {
        TUTORIAL_LEDGES[usize::from(screen)]
            .iter()
            .map(|&(x, rise, w)| Placement::Platform { x, rise, w })
            .collect()
    } else {
        // Later screens climb in a staircase from the spawn ledge, growing
        // taller and wider with every screen.
        let step = f32::from((level - 2) * SCREENS_PER_LEVEL + screen);
        let base_rise = 130.0 + 10.0 * step;
        let base_width = 95.0 + 5.0 * step;
        (0..5)
            .map(|j| Placement::Platform {
                x: spawn_x + STAIRCASE_SPACING * j as f32,
                rise: base_rise + STAIRCASE_RISE[j],
                w: base_width + STAIRCASE_WIDTH[j],
            })
            .collect()
    };

    if level == 1 {
        let row = |start: f32, gap: f32| (0..3).map(move |i| start + gap * i as f32);
        match screen {
            1 => {
                out.extend(row(400.0, 150.0).map(|x| Placement::Enemy { x, speed: -1.0 }));
                out.extend(row(700.0, 120.0).map(|x| Placement::WhiteEnemy { x, speed: -1.5 }));
            },
            2 => {
                out.extend((0..3).map(|i| Placement::FlyingEnemy {
                    x: 350.0 + 180.0 * i as f32,
                    rise: 120.0 + 20.0 * i as f32,
                    speed: -1.5,
                }));
            },
            3 => {
                out.extend(row(450.0, 160.0).map(|x| Placement::WhiteEnemy { x, speed: -2.0 }));
                out.extend(row(500.0, 140.0).map(|x| Placement::Enemy { x, speed: -1.5 }));
            },
            _ => {},
        }
    }
    out
}

fn waves(level: u8, screen: u8) -> Vec<SpawnRule> {
    use SpawnKind::{Enemy, Spike, WhiteEnemy};
    let flying = SpawnKind::FlyingEnemy(Altitude::Band);
    let flying_at = |rise| SpawnKind::FlyingEnemy(Altitude::Rise(rise));

    match (level, screen) {
        (1, 0) => vec![SpawnRule::new(Spike, 1.5)],
        (1, 1) => vec![
            SpawnRule::new(Enemy, 2.0),
            SpawnRule::new(WhiteEnemy, 1.5).inset(50.0).chance(0.5),
        ],
        (1, 2) => vec![SpawnRule::new(flying, 1.5)],
        (1, 3) => vec![
            SpawnRule::new(WhiteEnemy, 2.0),
            SpawnRule::new(Enemy, 1.5).inset(50.0).chance(0.5),
        ],
        (2, 0) => vec![SpawnRule::new(Spike, 1.2)],
        (2, 1) => vec![
            SpawnRule::new(Enemy, 1.8),
            SpawnRule::new(Enemy, 1.8).opposite().chance(0.7),
        ],
        (2, 2) => vec![
            SpawnRule::new(Enemy, 1.5),
            SpawnRule::new(WhiteEnemy, 1.2).opposite().inset(100.0).chance(0.5),
        ],
        (2, 3) => vec![SpawnRule::new(Enemy, 2.2)],
        (3, 0) => vec![SpawnRule::new(Spike, 1.8)],
        (3, 1) => [0.0, 200.0, 400.0]
            .into_iter()
            .map(|inset| SpawnRule::new(Enemy, 2.0).inset(inset))
            .collect(),
        (3, 2) => vec![
            SpawnRule::new(Enemy, 1.8),
            SpawnRule::new(flying_at(120.0), 1.5).inset(300.0),
        ],
        (3, 3) => vec![
            SpawnRule::new(Enemy, 2.0),
            SpawnRule::new(WhiteEnemy, 1.8).opposite().inset(150.0),
            SpawnRule::new(flying_at(140.0), 1.6).inset(400.0).chance(0.5),
        ],
        (4, 0) => vec![
            SpawnRule::new(Enemy, 2.5),
            SpawnRule::new(WhiteEnemy, 2.0).inset(50.0).chance(0.75),
        ],
        (4, 1) => vec![
            SpawnRule::new(flying, 2.0),
            SpawnRule::new(Enemy, 2.5).inset(50.0).chance(0.75),
        ],
        (4, 2) => vec![
            SpawnRule::new(WhiteEnemy, 3.0),
            SpawnRule::new(flying, 2.5).chance(0.75),
        ],
        (4, 3) => vec![
            SpawnRule::new(Enemy, 3.0),
            SpawnRule::new(WhiteEnemy, 2.5).inset(50.0).chance(0.75),
        ],
        // Levels 5 and 6 always send the escort.
        (5 | 6, _) => {
            let bump = if level == 6 { 1.0 } else { 0.0 };
            match screen {
                0 => vec![
                    SpawnRule::new(Enemy, 3.5 + bump),
                    SpawnRule::new(WhiteEnemy, 3.0 + bump).inset(50.0),
                ],
                1 => vec![
                    SpawnRule::new(flying, 3.0 + bump),
                    SpawnRule::new(Enemy, 3.5 + bump).inset(50.0),
                ],
                2 => vec![
                    SpawnRule::new(WhiteEnemy, 4.0 + bump),
                    SpawnRule::new(flying, 3.5 + bump),
                ],
                _ => vec![
                    SpawnRule::new(Enemy, 4.0 + bump),
                    SpawnRule::new(WhiteEnemy, 3.5 + bump).inset(50.0),
                ],
            }
        },
        _ => Vec::new(),
    }
}
