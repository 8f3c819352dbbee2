//! Loading, editing and saving a µVision project file.
//!
//! [`ProjectEditor`] owns the parsed document for its whole lifetime. Every
//! operation works on the in-memory tree; nothing reaches the disk until
//! [`ProjectEditor::save`] or [`ProjectEditor::save_to`] is called.
//!
//! ## Stored paths
//!
//! Files and include paths are stored relative to the directory holding the
//! project file (see [`project_relative`]). Lookups compare stored paths with
//! [`paths_equal`](crate::utils::paths_equal), so `..\Src`, `../src/` and
//! `../SRC` all refer to the same entry.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{
    error::{ProjectError, Result},
    group::{self, FileEntry},
    summary::{AddReport, GroupSummary, ProjectSummary, RemoveReport, TargetSummary},
    target::TargetScope,
};
use crate::{
    config::EditorOptions,
    scanner::{FolderScan, Scanner},
    utils::path::{absolutize, folder_name, project_relative},
    xml::{XmlDocument, XmlElement},
};

/// An open project file.
#[derive(Debug)]
pub struct ProjectEditor {
    /// Absolute path of the project file
    path: PathBuf,

    /// Directory all stored paths are relative to
    project_dir: PathBuf,

    document: XmlDocument,
    scope: TargetScope,
    options: EditorOptions,
}

impl ProjectEditor {
    /// Read and parse a project file.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Io`] if the file cannot be read and
    /// [`ProjectError::Parse`] if it is not a well-formed XML document.
    pub fn open(project_path: &Path, options: EditorOptions) -> Result<Self> {
        let content = fs::read_to_string(project_path).map_err(|source| ProjectError::Io {
            path: project_path.to_path_buf(),
            source,
        })?;

        Self::from_xml(&content, project_path, options)
    }

    /// Build an editor from XML text that belongs to `project_path`.
    ///
    /// The file itself is not read; `project_path` only fixes the directory
    /// stored paths are relative to and the default save location.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Parse`] if `xml` is not a well-formed document.
    pub fn from_xml(xml: &str, project_path: &Path, options: EditorOptions) -> Result<Self> {
        let document = XmlDocument::parse(xml).map_err(|source| ProjectError::Parse {
            path: project_path.to_path_buf(),
            source,
        })?;

        let path = absolutize(project_path);
        let project_dir = path
            .parent()
            .map_or_else(|| path.clone(), Path::to_path_buf);
        let scope = TargetScope::resolve(document.root());

        match &scope {
            TargetScope::AllTargets(targets) => {
                debug!("Opened {} with {} target(s)", path.display(), targets.len());
            }
            TargetScope::LegacyDefault => {
                debug!("Opened {} without targets, using the default compiler settings", path.display());
            }
        }

        Ok(Self {
            path,
            project_dir,
            document,
            scope,
            options,
        })
    }

    /// Absolute path of the project file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    #[must_use]
    pub const fn scope(&self) -> &TargetScope {
        &self.scope
    }

    #[must_use]
    pub const fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// The path that would be stored in the project for `path`.
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> String {
        project_relative(path, &self.project_dir)
    }

    // ── Include paths ──────────────────────────────────────────────────

    /// Register `dir` as an include path.
    ///
    /// With `target` set only the target with that `TargetName` is changed;
    /// otherwise every target (or the default compiler settings of a project
    /// without targets). Returns `true` if at least one list gained the entry.
    pub fn add_include_path(&mut self, dir: &Path, target: Option<&str>) -> bool {
        let stored = self.relative_path(dir);
        let added = self
            .scope
            .edit_include_paths(self.document.root_mut(), target, |list| usize::from(list.insert(&stored)));

        if self.options.verbose {
            if added > 0 {
                info!("Added include path {stored}");
            } else {
                info!("Include path {stored} already present");
            }
        }

        added > 0
    }

    /// Remove `dir` and every include path below it.
    ///
    /// Targets are addressed as in [`Self::add_include_path`]. Returns `true`
    /// if anything was removed.
    pub fn remove_include_path(&mut self, dir: &Path, target: Option<&str>) -> bool {
        self.remove_include_path_entries(dir, target) > 0
    }

    fn remove_include_path_entries(&mut self, dir: &Path, target: Option<&str>) -> usize {
        let stored = self.relative_path(dir);
        let removed = self
            .scope
            .edit_include_paths(self.document.root_mut(), target, |list| list.remove_with_subdirs(&stored));

        if self.options.verbose && removed > 0 {
            info!("Removed include path {stored} ({removed} entries)");
        }

        removed
    }

    // ── Files ──────────────────────────────────────────────────────────

    /// Add `file` to the group named `group_name`, creating the group if
    /// needed.
    ///
    /// Files that do not exist are skipped with a warning; files the group
    /// already references are skipped. Returns `true` if an entry was created.
    pub fn add_file(&mut self, file: &Path, group_name: &str) -> bool {
        if !file.is_file() {
            warn!("File {} does not exist, skipping", file.display());
            return false;
        }

        let stored = self.relative_path(file);
        let verbose = self.options.verbose;
        let Some(group) = group::group_mut_or_insert(self.document.root_mut(), group_name) else {
            return false;
        };

        add_entry(group, file, stored, verbose)
    }

    /// Remove every entry referencing `file`, in any group.
    ///
    /// Groups left without files are kept. Returns `true` if at least one
    /// entry was removed.
    pub fn remove_file(&mut self, file: &Path) -> bool {
        let stored = self.relative_path(file);
        let removed = group::remove_files(self.document.root_mut(), &stored);

        if self.options.verbose && removed > 0 {
            info!("Removed file {stored}");
        }

        removed > 0
    }

    // ── Folder operations ──────────────────────────────────────────────

    /// Add every recognized file below `folder` to a single group.
    ///
    /// The group is `group_name`, or the folder's own name, and is created
    /// when no group of that name exists. Every directory that directly
    /// contains a header becomes an include path.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Scan`] if `folder` is not an existing directory.
    pub fn scan_and_add_files_to_single_group(
        &mut self,
        folder: &Path,
        group_name: Option<&str>,
    ) -> Result<AddReport> {
        let scan = self.scan(folder)?;
        let group_name = group_name.map_or_else(|| scan.root_name.clone(), str::to_string);
        let mut report = AddReport::default();

        if group::find_group(self.document.root(), &group_name).is_none() {
            group::insert_group(self.document.root_mut(), group::new_group(&group_name));
            report.groups_created += 1;
            if self.options.verbose {
                info!("Created group {group_name}");
            }
        }

        for file in scan.files() {
            if self.add_file(file, &group_name) {
                report.files_added += 1;
            }
        }

        for directory in scan.directories.iter().filter(|directory| directory.has_header) {
            if self.add_include_path(&directory.path, None) {
                report.include_paths_added += 1;
            }
        }

        Ok(report)
    }

    /// Add `folder` with one new group per directory that holds recognized
    /// files.
    ///
    /// The folder itself is registered as an include path first. Groups are
    /// named `<folder>` and `<folder>/<sub/dir>`; a new group is created even
    /// if one with the same name exists. Every such directory also becomes an
    /// include path.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Scan`] if `folder` is not an existing directory.
    pub fn scan_and_add_files(&mut self, folder: &Path) -> Result<AddReport> {
        let scan = self.scan(folder)?;
        let verbose = self.options.verbose;
        let mut report = AddReport::default();

        if self.add_include_path(&scan.root, None) {
            report.include_paths_added += 1;
        }

        for directory in &scan.directories {
            if directory.files.is_empty() {
                continue;
            }

            let name = directory.group_name(&scan.root_name);
            let mut group = group::new_group(&name);
            for file in &directory.files {
                let stored = self.relative_path(file);
                if add_entry(&mut group, file, stored, verbose) {
                    report.files_added += 1;
                }
            }

            group::insert_group(self.document.root_mut(), group);
            report.groups_created += 1;
            if verbose {
                info!("Created group {name}");
            }

            if self.add_include_path(&directory.path, None) {
                report.include_paths_added += 1;
            }
        }

        Ok(report)
    }

    /// Remove the entries of every recognized file currently below `folder`.
    ///
    /// Only files that still exist on disk are found. Returns how many of them
    /// had at least one entry removed.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Scan`] if `folder` is not an existing directory.
    pub fn remove_files_in_folder(&mut self, folder: &Path) -> Result<usize> {
        let scan = self.scan(folder)?;
        Ok(self.remove_scanned_files(&scan))
    }

    /// Undo an add of `folder`.
    ///
    /// Removes the entries of the files below it, the folder's include path
    /// together with every include path below it, and the first group named
    /// `group_name` (the folder's name by default). Groups created per
    /// subdirectory are not removed.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Scan`] if `folder` is not an existing directory.
    pub fn remove_folder(&mut self, folder: &Path, group_name: Option<&str>) -> Result<RemoveReport> {
        let scan = self.scan(folder)?;
        let files_removed = self.remove_scanned_files(&scan);
        let include_paths_removed = self.remove_include_path_entries(&scan.root, None);
        let group_name = group_name.map_or_else(|| scan.root_name.clone(), str::to_string);
        let group_removed = self.remove_group_by_name(&group_name);

        Ok(RemoveReport {
            files_removed,
            include_paths_removed,
            group_removed,
        })
    }

    fn remove_scanned_files(&mut self, scan: &FolderScan) -> usize {
        scan.files().filter(|file| self.remove_file(file)).count()
    }

    fn scan(&self, folder: &Path) -> Result<FolderScan> {
        Scanner::new(self.options.scan.clone()).scan_folder(folder)
    }

    // ── Groups ─────────────────────────────────────────────────────────

    /// Remove the first group named `name` together with its files.
    pub fn remove_group_by_name(&mut self, name: &str) -> bool {
        let removed = group::remove_group(self.document.root_mut(), name);
        if self.options.verbose && removed {
            info!("Removed group {name}");
        }
        removed
    }

    /// The first group named after the last component of `folder`.
    #[must_use]
    pub fn find_group_by_folder_name(&self, folder: &Path) -> Option<GroupSummary> {
        group::find_group(self.document.root(), &folder_name(folder)).map(GroupSummary::from_element)
    }

    // ── Listing and saving ─────────────────────────────────────────────

    /// Snapshot of targets, include paths and groups.
    #[must_use]
    pub fn summary(&self) -> ProjectSummary {
        let root = self.document.root();

        ProjectSummary {
            project: self.path.clone(),
            legacy_default: self.scope.is_legacy(),
            target_count: self.scope.targets().len(),
            targets: self
                .scope
                .include_paths(root)
                .into_iter()
                .map(|(name, list)| TargetSummary {
                    name,
                    include_paths: list.entries().to_vec(),
                })
                .collect(),
            groups: root
                .descendants("Group")
                .into_iter()
                .map(GroupSummary::from_element)
                .collect(),
        }
    }

    /// Write the document back to the file it was opened from.
    ///
    /// # Errors
    ///
    /// See [`Self::save_to`].
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path)
    }

    /// Write the document to `path`.
    ///
    /// The content goes to a temporary file in the same directory which then
    /// replaces `path`, so readers see either the old or the new file. The
    /// permissions of an existing file are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Serialize`] if the document cannot be written
    /// as XML and [`ProjectError::Persist`] if any file operation fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let bytes = self.document.to_bytes().map_err(ProjectError::Serialize)?;

        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let persist_error = |source| ProjectError::Persist {
            path: path.to_path_buf(),
            source,
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(persist_error)?;
        temp.write_all(&bytes).map_err(persist_error)?;
        temp.as_file().sync_all().map_err(persist_error)?;

        match fs::metadata(path) {
            Ok(metadata) => temp
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(persist_error)?,
            Err(_) => set_new_file_permissions(temp.as_file()).map_err(persist_error)?,
        }

        temp.persist(path).map_err(|e| persist_error(e.error))?;
        debug!("Saved {}", path.display());
        Ok(())
    }
}

/// Give a newly created project file ordinary read/write permissions instead
/// of the owner-only mode of the temporary file.
#[cfg(unix)]
fn set_new_file_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
const fn set_new_file_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

/// Append an entry for `file` to `group` unless it is already referenced.
fn add_entry(group: &mut XmlElement, file: &Path, stored: String, verbose: bool) -> bool {
    if group::has_file(group, &stored) {
        if verbose {
            info!("File {stored} already in group {}, skipping", group::group_name(group));
        }
        return false;
    }

    let entry = FileEntry::for_path(file, stored);
    group::push_file(group, &entry);
    if verbose {
        info!("Added file {}", entry.path);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanOptions;
    use std::fs;
    use tempfile::TempDir;

    const PROJECT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no" ?>
<Project xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="project_projx.xsd">
  <SchemaVersion>2.1</SchemaVersion>
  <Header>### uVision Project, (C) Keil Software</Header>
  <Targets>
    <Target>
      <TargetName>Debug</TargetName>
      <ToolsetNumber>0x4</ToolsetNumber>
      <TargetOption>
        <TargetArmAds>
          <Cads>
            <VariousControls>
              <MiscControls></MiscControls>
              <Define>USE_HAL_DRIVER</Define>
              <IncludePath>..\Inc</IncludePath>
            </VariousControls>
          </Cads>
        </TargetArmAds>
      </TargetOption>
      <Groups>
        <Group>
          <GroupName>Startup</GroupName>
        </Group>
      </Groups>
    </Target>
    <Target>
      <TargetName>Release</TargetName>
      <TargetOption>
        <TargetArmAds>
          <Cads>
            <VariousControls>
              <IncludePath></IncludePath>
            </VariousControls>
          </Cads>
        </TargetArmAds>
      </TargetOption>
    </Target>
  </Targets>
</Project>
"#;

    /// A temp workspace with `Project/App.uvprojx` and an empty `Source` dir.
    fn workspace() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("Project")).unwrap();
        fs::create_dir_all(temp_dir.path().join("Source")).unwrap();
        let project = temp_dir.path().join("Project").join("App.uvprojx");
        fs::write(&project, PROJECT).unwrap();
        (temp_dir, project)
    }

    fn create_file(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    fn open(project: &Path) -> ProjectEditor {
        ProjectEditor::open(project, EditorOptions::default()).unwrap()
    }

    fn include_paths(editor: &ProjectEditor) -> Vec<Vec<String>> {
        editor
            .summary()
            .targets
            .into_iter()
            .map(|target| target.include_paths)
            .collect()
    }

    fn group<'a>(summary: &'a ProjectSummary, name: &str) -> &'a GroupSummary {
        summary.groups.iter().find(|g| g.name == name).unwrap()
    }

    #[test]
    fn test_open_resolves_targets_and_project_dir() {
        let (temp_dir, project) = workspace();
        let editor = open(&project);

        assert_eq!(editor.scope().targets().len(), 2);
        assert_eq!(editor.project_dir(), absolutize(&temp_dir.path().join("Project")));
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ProjectEditor::open(&temp_dir.path().join("none.uvprojx"), EditorOptions::default());
        assert!(matches!(result, Err(ProjectError::Io { .. })));
    }

    #[test]
    fn test_open_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("bad.uvprojx");
        fs::write(&project, "<Project><Targets></Project>").unwrap();

        let result = ProjectEditor::open(&project, EditorOptions::default());
        assert!(matches!(result, Err(ProjectError::Parse { .. })));
    }

    #[test]
    fn test_relative_path_uses_markers() {
        let (temp_dir, project) = workspace();
        let editor = open(&project);

        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(
            editor.relative_path(&temp_dir.path().join("Source").join("a.c")),
            format!("..{sep}Source{sep}a.c")
        );
        assert_eq!(
            editor.relative_path(&temp_dir.path().join("Project").join("src")),
            format!(".{sep}src")
        );
    }

    #[test]
    fn test_add_include_path_is_idempotent_across_targets() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);
        let source = temp_dir.path().join("Source");

        assert!(editor.add_include_path(&source, None));
        assert!(!editor.add_include_path(&source, None));

        let sep = std::path::MAIN_SEPARATOR;
        let stored = format!("..{sep}Source");
        assert_eq!(
            include_paths(&editor),
            vec![vec!["..\\Inc".to_string(), stored.clone()], vec![stored]]
        );
    }

    #[test]
    fn test_add_include_path_to_named_target() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);
        let source = temp_dir.path().join("Source");

        assert!(editor.add_include_path(&source, Some("Release")));
        assert!(!editor.add_include_path(&source, Some("Nightly")));

        let paths = include_paths(&editor);
        assert_eq!(paths[0], vec!["..\\Inc".to_string()]);
        assert_eq!(paths[1].len(), 1);
    }

    #[test]
    fn test_remove_include_path_with_subdirectories() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);
        let source = temp_dir.path().join("Source");

        editor.add_include_path(&source, None);
        editor.add_include_path(&source.join("sub"), None);
        assert!(editor.remove_include_path(&source, None));
        assert!(!editor.remove_include_path(&source, None));

        assert_eq!(include_paths(&editor), vec![vec!["..\\Inc".to_string()], vec![]]);
    }

    #[test]
    fn test_remove_project_dir_include_path_takes_subdirectories() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);
        let project_dir = temp_dir.path().join("Project");

        editor.add_include_path(&project_dir, None);
        editor.add_include_path(&project_dir.join("inc"), None);
        assert_eq!(include_paths(&editor)[1].len(), 2);

        assert!(editor.remove_include_path(&project_dir, None));
        assert_eq!(include_paths(&editor), vec![vec!["..\\Inc".to_string()], vec![]]);
    }

    #[test]
    fn test_add_file_creates_group_and_skips_duplicates() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);
        let file = temp_dir.path().join("Source").join("main.c");
        create_file(&file);

        assert!(editor.add_file(&file, "App"));
        assert!(!editor.add_file(&file, "App"));

        let summary = editor.summary();
        let app = group(&summary, "App");
        assert_eq!(app.files.len(), 1);
        assert_eq!(app.files[0].name, "main.c");
        assert_eq!(app.files[0].file_type, Some(1));
    }

    #[test]
    fn test_add_file_missing_on_disk() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);

        assert!(!editor.add_file(&temp_dir.path().join("Source").join("ghost.c"), "App"));
        assert!(editor.summary().groups.iter().all(|g| g.name != "App"));
    }

    #[test]
    fn test_add_then_remove_file_keeps_group() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);
        let file = temp_dir.path().join("Source").join("uart.c");
        create_file(&file);

        editor.add_file(&file, "Startup");
        assert!(editor.remove_file(&file));
        assert!(!editor.remove_file(&file));

        let summary = editor.summary();
        assert!(group(&summary, "Startup").files.is_empty());
    }

    #[test]
    fn test_remove_file_spans_groups() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);
        let file = temp_dir.path().join("Source").join("shared.c");
        create_file(&file);

        editor.add_file(&file, "A");
        editor.add_file(&file, "B");
        assert!(editor.remove_file(&file));
        assert_eq!(editor.summary().file_count(), 0);
    }

    #[test]
    fn test_single_group_scan() {
        let (temp_dir, project) = workspace();
        let folder = temp_dir.path().join("Source").join("Test");
        create_file(&folder.join("a.c"));
        create_file(&folder.join("b.h"));
        create_file(&folder.join("sub").join("c.c"));
        create_file(&folder.join("notes.txt"));

        let mut editor = open(&project);
        let report = editor.scan_and_add_files_to_single_group(&folder, None).unwrap();

        assert_eq!(
            report,
            AddReport {
                groups_created: 1,
                files_added: 3,
                include_paths_added: 1,
            }
        );

        let summary = editor.summary();
        let test = group(&summary, "Test");
        let files: Vec<(&str, Option<u8>)> =
            test.files.iter().map(|f| (f.name.as_str(), f.file_type)).collect();
        assert_eq!(files, vec![("a.c", Some(1)), ("b.h", Some(5)), ("c.c", Some(1))]);

        let sep = std::path::MAIN_SEPARATOR;
        let paths = include_paths(&editor);
        assert!(paths[0].contains(&format!("..{sep}Source{sep}Test")));
        assert!(!paths[0].iter().any(|p| p.ends_with("sub")));
    }

    #[test]
    fn test_single_group_scan_reuses_named_group() {
        let (temp_dir, project) = workspace();
        let folder = temp_dir.path().join("Source");
        create_file(&folder.join("startup.s"));

        let mut editor = open(&project);
        let report = editor
            .scan_and_add_files_to_single_group(&folder, Some("Startup"))
            .unwrap();

        assert_eq!(report.groups_created, 0);
        let summary = editor.summary();
        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.groups[0].files[0].file_type, Some(2));
        assert_eq!(report.include_paths_added, 0);
    }

    #[test]
    fn test_recursive_scan_creates_group_per_directory() {
        let (temp_dir, project) = workspace();
        let folder = temp_dir.path().join("Source").join("Test");
        create_file(&folder.join("a.c"));
        create_file(&folder.join("sub").join("c.c"));
        fs::create_dir_all(folder.join("empty")).unwrap();

        let mut editor = open(&project);
        let report = editor.scan_and_add_files(&folder).unwrap();

        assert_eq!(report.groups_created, 2);
        assert_eq!(report.files_added, 2);
        assert_eq!(report.include_paths_added, 2);

        let names: Vec<String> = editor.summary().groups.into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Startup", "Test", "Test/sub"]);

        // A second run always adds new groups
        editor.scan_and_add_files(&folder).unwrap();
        assert_eq!(editor.summary().groups.len(), 5);
    }

    #[test]
    fn test_remove_folder_after_single_group_add() {
        let (temp_dir, project) = workspace();
        let folder = temp_dir.path().join("Source").join("Test");
        create_file(&folder.join("a.c"));
        create_file(&folder.join("b.h"));

        let mut editor = open(&project);
        editor.scan_and_add_files_to_single_group(&folder, None).unwrap();
        let report = editor.remove_folder(&folder, None).unwrap();

        assert_eq!(report.files_removed, 2);
        assert_eq!(report.include_paths_removed, 2);
        assert!(report.group_removed);
        assert!(editor.find_group_by_folder_name(&folder).is_none());
        assert_eq!(include_paths(&editor), vec![vec!["..\\Inc".to_string()], vec![]]);
    }

    #[test]
    fn test_remove_files_in_folder_counts_files() {
        let (temp_dir, project) = workspace();
        let folder = temp_dir.path().join("Source").join("Test");
        create_file(&folder.join("a.c"));
        create_file(&folder.join("b.c"));

        let mut editor = open(&project);
        editor.scan_and_add_files_to_single_group(&folder, None).unwrap();
        fs::remove_file(folder.join("b.c")).unwrap();

        assert_eq!(editor.remove_files_in_folder(&folder).unwrap(), 1);
        let group = editor.find_group_by_folder_name(&folder).unwrap();
        assert_eq!(group.files.len(), 1);
        assert_eq!(group.files[0].name, "b.c");
    }

    #[test]
    fn test_scan_missing_folder_is_error() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);
        let result = editor.scan_and_add_files(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(ProjectError::Scan { .. })));
    }

    #[test]
    fn test_scan_options_are_honored() {
        let (temp_dir, project) = workspace();
        let folder = temp_dir.path().join("Source");
        create_file(&folder.join("a.c"));
        create_file(&folder.join("build").join("gen.c"));

        let options = EditorOptions {
            verbose: false,
            scan: ScanOptions {
                skip: vec![PathBuf::from("build")],
                ..ScanOptions::default()
            },
        };
        let mut editor = ProjectEditor::open(&project, options).unwrap();
        let report = editor.scan_and_add_files_to_single_group(&folder, None).unwrap();
        assert_eq!(report.files_added, 1);
    }

    #[test]
    fn test_remove_group_by_name() {
        let (_temp_dir, project) = workspace();
        let mut editor = open(&project);

        assert!(editor.remove_group_by_name("Startup"));
        assert!(!editor.remove_group_by_name("Startup"));
        assert!(editor.summary().groups.is_empty());
    }

    #[test]
    fn test_legacy_project_uses_default_compiler_settings() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("Old.uvproj");
        fs::write(
            &project,
            "<Project><Cads><VariousControls><IncludePath/></VariousControls></Cads></Project>",
        )
        .unwrap();
        let file = temp_dir.path().join("src").join("main.c");
        create_file(&file);

        let mut editor = open(&project);
        assert!(editor.scope().is_legacy());
        assert!(editor.add_include_path(&temp_dir.path().join("src"), None));
        assert!(editor.add_file(&file, "Src"));

        let summary = editor.summary();
        assert!(summary.legacy_default);
        assert_eq!(summary.targets[0].name, None);
        assert_eq!(summary.targets[0].include_paths.len(), 1);
        assert_eq!(summary.groups.len(), 1);
    }

    #[test]
    fn test_save_round_trip_preserves_unrelated_content() {
        let (_temp_dir, project) = workspace();
        let editor = open(&project);
        editor.save().unwrap();

        let original = XmlDocument::parse(PROJECT).unwrap();
        let saved = XmlDocument::parse(&fs::read_to_string(&project).unwrap()).unwrap();
        assert_eq!(original, saved);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_to_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let (temp_dir, project) = workspace();
        let copy = temp_dir.path().join("new.uvprojx");
        open(&project).save_to(&copy).unwrap();

        let mode = fs::metadata(&copy).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp_dir, project) = workspace();
        fs::set_permissions(&project, fs::Permissions::from_mode(0o664)).unwrap();
        open(&project).save().unwrap();

        let mode = fs::metadata(&project).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o664);
    }

    #[test]
    fn test_save_to_other_path() {
        let (temp_dir, project) = workspace();
        let mut editor = open(&project);
        editor.remove_group_by_name("Startup");

        let copy = temp_dir.path().join("copy.uvprojx");
        editor.save_to(&copy).unwrap();

        let saved = fs::read_to_string(&copy).unwrap();
        assert!(saved.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"));
        assert!(!saved.contains("Startup"));
        assert!(fs::read_to_string(&project).unwrap().contains("Startup"));
    }
}
