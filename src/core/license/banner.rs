use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;

const BUILTIN: &str = "\
//============================================================================//
//                                                                            //
// ozz-animation, 3d skeletal animation libraries and tools.                  //
// https://code.google.com/p/ozz-animation/                                   //
//                                                                            //
//----------------------------------------------------------------------------//
//                                                                            //
// Copyright (c) 2012-2014 Guillaume Blanc                                    //
//                                                                            //
// This software is provided 'as-is', without any express or implied          //
// warranty. In no event will the authors be held liable for any damages      //
// arising from the use of this software.                                     //
//                                                                            //
// Permission is granted to anyone to use this software for any purpose,      //
// including commercial applications, and to alter it and redistribute it     //
// freely, subject to the following restrictions:                             //
//                                                                            //
// 1. The origin of this software must not be misrepresented; you must not    //
// claim that you wrote the original software. If you use this software       //
// in a product, an acknowledgment in the product documentation would be      //
// appreciated but is not required.                                           //
//                                                                            //
// 2. Altered source versions must be plainly marked as such, and must not be //
// misrepresented as being the original software.                             //
//                                                                            //
// 3. This notice may not be removed or altered from any source               //
// distribution.                                                              //
//                                                                            //
//============================================================================//
";

/// License comment block placed at the top of every file.
///
/// The canonical form in a file is the banner text, one blank line, then the
/// first preprocessor directive. [`Banner::anchor`] is that whole prefix
/// including the trailing `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    text: String,
    anchor: String,
}

impl Default for Banner {
    fn default() -> Self {
        Self::from_text(BUILTIN)
    }
}

impl Banner {
    pub fn from_text(text: &str) -> Self {
        let mut text = text.trim_end_matches('\n').to_string();
        text.push('\n');
        let anchor = format!("{}\n#", text);
        Self { text, anchor }
    }

    /// Banner read from a file, e.g. a project's own license block.
    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_file(path, "read banner file")?;
        if content.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "license.banner_file",
                Some(path.display().to_string()),
                "banner file is empty",
            ));
        }
        Ok(Self::from_text(&content))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }
}
