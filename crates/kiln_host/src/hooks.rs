//! Implementations of the compile service's hooks over host state.

use std::collections::HashMap;
use std::path::Path;

use kiln_cache::FileCache;
use kiln_source::{follow, CanonicalPath, OutputPathMapper};

use crate::events::{HostEvent, Listeners};
use crate::service::{CompileService, OutputWriter, SourceLoader};

/// Serves source reads from the file cache and reports each one.
pub(crate) struct CacheLoader<'a, S: CompileService> {
    pub(crate) service: &'a S,
    pub(crate) cache: &'a mut FileCache<S::Handle>,
    pub(crate) listeners: &'a mut Listeners,
}

impl<S: CompileService> SourceLoader<S::Handle> for CacheLoader<'_, S> {
    fn read_source(&mut self, path: &Path) -> Option<S::Handle> {
        let service = self.service;
        let admitted = self
            .cache
            .load(path, |name, contents| service.parse(name, contents))?;
        self.listeners.dispatch(HostEvent::File(admitted.observed));
        Some(admitted.parsed)
    }
}

/// Stores emitted output under its canonical output path.
///
/// When the source an output belongs to sits behind a symlinked directory, the
/// bytes are stored a second time under the output path of the real source,
/// so both views of the file can be retrieved.
pub(crate) struct MappedWriter<'a> {
    pub(crate) current_dir: &'a CanonicalPath,
    pub(crate) mapper: &'a OutputPathMapper,
    pub(crate) outputs: &'a mut HashMap<CanonicalPath, Vec<u8>>,
}

impl MappedWriter<'_> {
    fn real_output(&self, key: &CanonicalPath) -> Option<CanonicalPath> {
        let source = self.mapper.to_source(key);
        let name = source.as_path().file_name()?;
        let dir = source.parent()?;
        let real_dir = match follow(dir.as_path()) {
            Ok(real_dir) => real_dir,
            Err(err) => {
                log::debug!("not checking {source} for aliasing: {err}");
                return None;
            }
        };

        let real = self.current_dir.join(real_dir.join(name));
        (real != source).then(|| self.mapper.to_output(&real))
    }
}

impl OutputWriter for MappedWriter<'_> {
    fn write_output(&mut self, path: &Path, data: &[u8]) {
        let key = self.current_dir.join(path);
        if let Some(real) = self.real_output(&key) {
            log::debug!("{key} is reached through a link, also storing as {real}");
            self.outputs.insert(real, data.to_vec());
        }
        self.outputs.insert(key, data.to_vec());
    }
}
