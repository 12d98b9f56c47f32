use std::fmt;

/// CMake build type (`CMAKE_BUILD_TYPE` / `--config`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildConfiguration {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildConfiguration {
    /// Menu order; the sub-menu numbers entries from 1.
    pub const ALL: [BuildConfiguration; 4] = [
        BuildConfiguration::Debug,
        BuildConfiguration::Release,
        BuildConfiguration::RelWithDebInfo,
        BuildConfiguration::MinSizeRel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "Debug",
            BuildConfiguration::Release => "Release",
            BuildConfiguration::RelWithDebInfo => "RelWithDebInfo",
            BuildConfiguration::MinSizeRel => "MinSizeRel",
        }
    }

    /// 1-based sub-menu lookup.
    pub fn from_menu_number(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
