//! Resolution of `import` declarations into parsed [`Module`]s.
//!
//! `import a.b.c` refers to the file `a/b.dcs` and imports `c` from it.
//! Absolute imports are searched in the library directories in order.
//! Relative imports (`import .a.b`) are resolved against the root of the
//! project or library containing the importing file.
//!
//! Every file is parsed at most once per [`Resolver`]. All imports of the
//! same file share one [`Program`].

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dachs_ast::{Import, Module, Node, Program};
use dachs_core::{Error, LogTags, Logger, Source, log, note_on};
use dashmap::{DashMap, DashSet};

use crate::parser::parse;

/// Extension of Dachs source files.
pub const SOURCE_EXTENSION: &str = "dcs";

/// Environment variable listing extra library directories.
pub const LIB_PATH_ENV: &str = "DACHS_LIB_PATH";

/// Library directories searched by absolute imports.
///
/// `<dir of exe>/lib/dachs` comes first, followed by the colon separated
/// entries of `env`. Empty entries are ignored and relative ones are made
/// absolute against the current directory.
pub fn library_paths(exe: &Path, env: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let exe_dir = exe.parent().unwrap_or_else(|| Path::new(""));
    paths.push(exe_dir.join("lib").join("dachs"));

    for entry in env.unwrap_or_default().split(':') {
        if entry.is_empty() {
            continue;
        }
        match std::path::absolute(entry) {
            Ok(p) => paths.push(p),
            Err(err) => tracing::debug!(target: "dachs", "Cannot make '{}' absolute: {}", entry, err),
        }
    }
    paths
}

pub struct Resolver {
    lib_paths: Vec<PathBuf>,
    /// Directory of the root program.
    project_path: Option<PathBuf>,
    /// Canonical path to fully resolved program.
    parsed: DashMap<PathBuf, Arc<Program>>,
    /// Canonical paths of files whose imports are being resolved.
    resolving: DashSet<PathBuf>,
    logger: Logger,
}

impl Resolver {
    /// Resolver searching the library paths of the running executable and
    /// `DACHS_LIB_PATH`.
    pub fn new(logger: Logger) -> std::io::Result<Self> {
        let exe = std::env::current_exe()?;
        let env = std::env::var(LIB_PATH_ENV).ok();
        Ok(Self::with_library_paths(
            library_paths(&exe, env.as_deref()),
            logger,
        ))
    }

    pub fn with_library_paths(lib_paths: Vec<PathBuf>, logger: Logger) -> Self {
        let logger = logger.for_tag(LogTags::PARSING);
        log!(logger, "Library paths: {}", display_paths(&lib_paths));
        Self {
            lib_paths,
            project_path: None,
            parsed: DashMap::new(),
            resolving: DashSet::new(),
            logger,
        }
    }

    pub fn library_paths(&self) -> &[PathBuf] {
        &self.lib_paths
    }

    /// Resolve all imports of `root` recursively and fill `modules` of every
    /// program on the way.
    ///
    /// The directory of `root` becomes the project path. A root which does
    /// not exist on the filesystem uses the current directory instead.
    pub fn resolve_imports(&mut self, root: &mut Program) -> Result<(), Error> {
        self.project_path = if root.source.exists {
            Path::new(&root.source.name).parent().map(Path::to_path_buf)
        } else {
            std::env::current_dir().ok()
        };
        log!(
            self.logger,
            "Will resolve imports of {} in project {:?}",
            root.source.name,
            self.project_path
        );

        let key = root
            .source
            .exists
            .then(|| std::fs::canonicalize(&root.source.name).ok())
            .flatten();
        if let Some(key) = &key {
            self.resolving.insert(key.clone());
        }
        let result = self.resolve(root);
        if let Some(key) = &key {
            self.resolving.remove(key);
        }

        if result.is_ok() {
            log!(self.logger, "Finished resolving modules successfully");
        }
        result
    }

    fn project_display(&self) -> String {
        self.project_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    fn resolve(&self, prog: &mut Program) -> Result<(), Error> {
        log!(self.logger, "Will resolve imports in {}", prog.source.name);
        let imports: Vec<Import> = prog.imports().cloned().collect();
        for import in &imports {
            let module = self.resolve_import(import)?;
            prog.modules.push(module);
        }
        Ok(())
    }

    fn resolve_import(&self, import: &Import) -> Result<Module, Error> {
        if import.relative {
            let root = self.find_relative_root(import)?;
            log!(self.logger, "Found root directory for relative import: {}", root.display());
            return self.resolve_in_dir(&root, import).map_err(|err| {
                let project = self.project_display();
                note_on(
                    import.start.clone(),
                    Some(import.end.clone()),
                    err,
                    format!("Cannot import '{}' in project '{}'", import.path(), project),
                )
            });
        }

        let mut failures = Vec::with_capacity(self.lib_paths.len());
        for dir in &self.lib_paths {
            match self.resolve_in_dir(dir, import) {
                Ok(module) => return Ok(module),
                Err(err) => failures.push(err),
            }
        }

        let mut err = Error::new(
            import.start.clone(),
            import.end.clone(),
            format!(
                "Cannot import '{}'. Searched directories: {}",
                import.path(),
                display_paths(&self.lib_paths)
            ),
        );
        for failure in failures {
            err = err.note_at(&failure.start, failure.messages.join(": "));
        }
        Err(err)
    }

    /// Root directory of the project or library containing the importing
    /// file.
    fn find_relative_root(&self, import: &Import) -> Result<PathBuf, Error> {
        let source = &import.start.source;
        if !source.exists
            && let Some(project) = &self.project_path
        {
            return Ok(project.clone());
        }

        let dir = Path::new(&source.name)
            .parent()
            .unwrap_or_else(|| Path::new(""));
        log!(self.logger, "Will find root directory for relative import in {}", dir.display());

        if let Some(project) = &self.project_path
            && dir.starts_with(project)
        {
            return Ok(project.clone());
        }

        for lib in &self.lib_paths {
            // '/foo/lib/libname/bar/piyo' in '/foo/lib' belongs to the library
            // rooted at '/foo/lib/libname'
            if let Ok(rest) = dir.strip_prefix(lib) {
                return Ok(match rest.components().next() {
                    Some(first) => lib.join(first),
                    None => lib.clone(),
                });
            }
        }

        let project = self.project_display();
        Err(Error::new(
            import.start.clone(),
            import.end.clone(),
            format!(
                "Cannot import '{}' because directory '{}' does not belong to project path '{}' nor library paths {}",
                import.path(),
                dir.display(),
                project,
                display_paths(&self.lib_paths)
            ),
        ))
    }

    fn resolve_in_dir(&self, dir: &Path, import: &Import) -> Result<Module, Error> {
        let mut file = dir.to_path_buf();
        file.extend(&import.parents);
        file.set_extension(SOURCE_EXTENSION);

        let importer = Path::new(&import.start.source.name);
        let myself = || Error::new(import.start.clone(), import.end.clone(), "Cannot import myself");
        if file == importer {
            return Err(myself());
        }

        let (namespace, imported, expose_all) = if import.is_import_all() {
            // `import foo.*` exposes names of foo.dcs under the namespace 'foo'
            (import.parents.last().cloned(), vec![], true)
        } else {
            (None, import.imported.clone(), false)
        };

        let key = std::fs::canonicalize(&file).map_err(|err| {
            Error::new(
                import.start.clone(),
                import.end.clone(),
                format!("Cannot open '{}': {}", file.display(), err),
            )
        })?;
        if import.start.source.exists
            && std::fs::canonicalize(importer).is_ok_and(|p| p == key)
        {
            return Err(myself());
        }

        let cached = self.parsed.get(&key).map(|entry| entry.value().clone());
        let ast = match cached {
            Some(ast) => {
                log!(self.logger, "Resolved module from cache: {}", file.display());
                ast
            }
            None => {
                if !self.resolving.insert(key.clone()) {
                    return Err(Error::new(
                        import.start.clone(),
                        import.end.clone(),
                        format!("Import cycle detected while importing '{}'", file.display()),
                    ));
                }
                let loaded = self.load(import, &file, key.clone());
                self.resolving.remove(&key);
                loaded.map_err(|err| {
                    err.note_at(&import.start, format!("While importing '{}'", file.display()))
                })?
            }
        };

        Ok(Module {
            namespace,
            imported,
            expose_all,
            ast,
        })
    }

    /// Parse a file and resolve its own imports before caching it.
    fn load(&self, import: &Import, file: &Path, key: PathBuf) -> Result<Arc<Program>, Error> {
        let src = Source::from_file(file).map_err(|err| {
            Error::new(
                import.start.clone(),
                import.end.clone(),
                format!("Cannot read '{}': {}", file.display(), err),
            )
        })?;
        log!(self.logger, "Will parse module: {}", src.name);

        let mut prog = parse(src, self.logger)?;
        log!(self.logger, "Parsed module: {}", prog.source.name);

        self.resolve(&mut prog)?;

        let prog = Arc::new(prog);
        self.parsed.insert(key, prog.clone());
        Ok(prog)
    }
}

/// Resolve imports of `root` with the default library paths.
pub fn resolve_imports(root: &mut Program, logger: Logger) -> Result<(), Error> {
    let mut resolver = Resolver::new(logger).map_err(|err| {
        Error::at(
            root.start(),
            format!("Error occurred while getting library path: {}", err),
        )
    })?;
    resolver.resolve_imports(root)
}

fn display_paths(paths: &[PathBuf]) -> String {
    let mut s = String::from("[");
    for (i, p) in paths.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        let _ = write!(s, "'{}'", p.display());
    }
    s.push(']');
    s
}
