use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::error::ParseError;
use crate::parser::parse_template;
use crate::template::Template;

/// Identity of a static chunk array: its address and length. Each macro call
/// site owns one `static` array, so this is stable across evaluations.
type ChunksKey = (usize, usize);

fn key_of(chunks: &'static [&'static str]) -> ChunksKey {
    (chunks.as_ptr() as usize, chunks.len())
}

/// Parsed templates keyed by the identity of their chunk array.
///
/// Entries are never evicted. Failed parses are not stored.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RefCell<HashMap<ChunksKey, Rc<Template>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_parse(
        &self,
        chunks: &'static [&'static str],
    ) -> Result<Rc<Template>, ParseError> {
        let key = key_of(chunks);
        if let Some(template) = self.entries.borrow().get(&key) {
            trace!(chunks = chunks.len(), "template cache hit");
            return Ok(Rc::clone(template));
        }
        let template = Rc::new(parse_template(chunks)?);
        self.entries.borrow_mut().insert(key, Rc::clone(&template));
        Ok(template)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

thread_local! {
    static DEFAULT_CACHE: TemplateCache = TemplateCache::new();
}

/// Look up or parse `chunks` in this thread's shared cache.
pub fn cached_template(chunks: &'static [&'static str]) -> Result<Rc<Template>, ParseError> {
    DEFAULT_CACHE.with(|cache| cache.get_or_parse(chunks))
}
