//! Build targets and their compiler include paths.
//!
//! A project normally holds one `Target` element per build configuration,
//! each with its own compiler settings. Old projects without any `Target`
//! element keep a single compiler-settings subtree that acts as the implicit
//! default target.

use tracing::debug;

use super::include_path::IncludePathList;
use crate::xml::XmlElement;

/// Compiler-settings element names, in lookup order (ARM first, then C51).
/// Only elements with a `VariousControls` child count.
const COMPILER_SETTINGS: [&str; 2] = ["Cads", "C51"];

/// A `Target` element, identified by its position among all targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetRef {
    /// Index in document order among the document's `Target` elements
    pub index: usize,

    /// Text of the `TargetName` child (empty when missing)
    pub name: String,
}

/// Which include-path lists an operation fans out to.
///
/// Resolved once when the project is opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetScope {
    /// Every `Target` element of the document
    AllTargets(Vec<TargetRef>),

    /// No targets: the first compiler-settings subtree of the document
    LegacyDefault,
}

impl TargetScope {
    /// Inspect the document and decide how targets are addressed.
    #[must_use]
    pub fn resolve(root: &XmlElement) -> Self {
        let targets: Vec<TargetRef> = root
            .descendants("Target")
            .into_iter()
            .enumerate()
            .map(|(index, target)| TargetRef {
                index,
                name: target
                    .child_text("TargetName")
                    .map(|name| name.trim().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        if targets.is_empty() {
            Self::LegacyDefault
        } else {
            Self::AllTargets(targets)
        }
    }

    /// The discovered targets (empty for the legacy shape).
    #[must_use]
    pub fn targets(&self) -> &[TargetRef] {
        match self {
            Self::AllTargets(targets) => targets,
            Self::LegacyDefault => &[],
        }
    }

    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::LegacyDefault)
    }

    /// Read the include paths of every addressed target.
    ///
    /// Targets without compiler settings are left out. The legacy default is
    /// reported with `None` as its name.
    #[must_use]
    pub fn include_paths(&self, root: &XmlElement) -> Vec<(Option<String>, IncludePathList)> {
        match self {
            Self::LegacyDefault => default_controls(root)
                .map(|controls| vec![(None, stored_list(controls))])
                .unwrap_or_default(),
            Self::AllTargets(refs) => {
                let elements = root.descendants("Target");
                refs.iter()
                    .filter_map(|target| {
                        let controls = elements.get(target.index).copied().and_then(various_controls)?;
                        Some((Some(target.name.clone()), stored_list(controls)))
                    })
                    .collect()
            }
        }
    }

    /// Apply `edit` to the include-path list of every addressed target and
    /// write back the lists it changed.
    ///
    /// `target` selects a single target by name; `None` addresses all of them
    /// (or the legacy default). `edit` returns how many entries it changed.
    /// Returns the total over all targets.
    pub fn edit_include_paths(
        &self,
        root: &mut XmlElement,
        target: Option<&str>,
        mut edit: impl FnMut(&mut IncludePathList) -> usize,
    ) -> usize {
        match self {
            Self::LegacyDefault => {
                if target.is_some() {
                    return 0;
                }
                match default_controls_mut(root) {
                    Some(controls) => edit_controls(controls, &mut edit),
                    None => {
                        debug!("Project has no compiler settings, include paths left untouched");
                        0
                    }
                }
            }
            Self::AllTargets(refs) => {
                let mut elements = root.descendants_mut("Target");
                let mut changed = 0;

                for target_ref in refs {
                    if target.is_some_and(|name| name != target_ref.name) {
                        continue;
                    }
                    let Some(element) = elements.get_mut(target_ref.index) else {
                        continue;
                    };
                    match various_controls_mut(element) {
                        Some(controls) => changed += edit_controls(controls, &mut edit),
                        None => debug!(
                            "Target '{}' has no compiler settings, skipping",
                            target_ref.name
                        ),
                    }
                }

                changed
            }
        }
    }
}

/// The `VariousControls` element of the first compiler-settings subtree
/// below `scope` that has one.
fn various_controls(scope: &XmlElement) -> Option<&XmlElement> {
    let settings = compiler_settings(scope)?;
    scope.find(has_controls(settings))?.child("VariousControls")
}

fn various_controls_mut(scope: &mut XmlElement) -> Option<&mut XmlElement> {
    let settings = compiler_settings(scope)?;
    scope.find_mut(has_controls(settings))?.child_mut("VariousControls")
}

/// Name of the first compiler-settings kind present below `scope`.
fn compiler_settings(scope: &XmlElement) -> Option<&'static str> {
    COMPILER_SETTINGS
        .into_iter()
        .find(|name| scope.find(has_controls(name)).is_some())
}

fn has_controls(settings: &str) -> impl Fn(&XmlElement) -> bool + '_ {
    move |element: &XmlElement| element.name() == settings && element.child("VariousControls").is_some()
}

/// Compiler settings of a project without targets, falling back to the
/// first `VariousControls` anywhere in the document.
fn default_controls(root: &XmlElement) -> Option<&XmlElement> {
    various_controls(root).or_else(|| root.descendant("VariousControls"))
}

fn default_controls_mut(root: &mut XmlElement) -> Option<&mut XmlElement> {
    if compiler_settings(root).is_some() {
        various_controls_mut(root)
    } else {
        root.descendant_mut("VariousControls")
    }
}

fn stored_list(controls: &XmlElement) -> IncludePathList {
    controls
        .child_text("IncludePath")
        .map(|text| IncludePathList::parse(&text))
        .unwrap_or_default()
}

fn edit_controls(
    controls: &mut XmlElement,
    edit: &mut impl FnMut(&mut IncludePathList) -> usize,
) -> usize {
    let mut list = stored_list(controls);
    let changed = edit(&mut list);
    if changed > 0 {
        controls.child_or_insert("IncludePath").set_text(list.to_text());
    }
    changed
}
