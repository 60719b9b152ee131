//! Product list view model.
//!
//! Holds the full product collection plus the filter, sort and page the user
//! picked. The visible rows are always recomputed from those inputs, so the
//! displayed page is exactly the current page of the filtered and sorted
//! collection.

use std::cmp::Ordering;
use std::sync::Arc;

use catalog_core::{page_count, Page, Product, SortDirection, SortKey};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::repository::ProductRepository;
use crate::shell::Shell;
use crate::teardown::{TeardownHandle, ViewScope};

/// Page sizes offered by the paginator.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 100];

/// Result of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

pub struct ListViewModel {
    repository: Arc<dyn ProductRepository>,
    shell: Arc<dyn Shell>,
    scope: ViewScope,
    notify_duration_ms: u64,

    source: Vec<Product>,
    /// Indices into `source`, filtered then sorted.
    visible: Vec<usize>,
    filter: String,
    sort: Option<(SortKey, SortDirection)>,
    page_index: usize,
    page_size: usize,
}

impl ListViewModel {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        shell: Arc<dyn Shell>,
        config: &Config,
    ) -> Self {
        Self {
            repository,
            shell,
            scope: ViewScope::new(),
            notify_duration_ms: config.notify_duration_ms,
            source: Vec::new(),
            visible: Vec::new(),
            filter: String::new(),
            sort: None,
            page_index: 0,
            page_size: config.page_size.max(1),
        }
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    /// Replace the collection from the repository.
    ///
    /// Reloads take `&mut self`, so two reloads of one view model never
    /// overlap and the one issued last is the one displayed.
    pub async fn reload(&mut self) -> Result<()> {
        match self.scope.run(self.repository.list()).await {
            Ok(products) => {
                debug!("Loaded {} products", products.len());
                self.set_source(products);
                Ok(())
            }
            Err(Error::ViewClosed) => Err(Error::ViewClosed),
            Err(e) => {
                warn!("Failed to load products: {}", e);
                self.shell.notify(&e.user_message(), self.notify_duration_ms);
                Err(e)
            }
        }
    }

    pub fn set_source(&mut self, products: Vec<Product>) {
        self.source = products;
        self.recompute();
    }

    pub fn source(&self) -> &[Product] {
        &self.source
    }

    /// Filter by a case-insensitive substring of name, category or price.
    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.trim().to_lowercase();
        self.page_index = 0;
        self.recompute();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort = Some((key, direction));
        self.recompute();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.recompute();
    }

    /// Header click: ascending, then descending, then back to source order.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == key => {
                Some((key, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == key => None,
            _ => Some((key, SortDirection::Ascending)),
        };
        self.recompute();
    }

    pub fn sort(&self) -> Option<(SortKey, SortDirection)> {
        self.sort
    }

    /// The filtered and sorted rows, across all pages.
    pub fn visible(&self) -> impl Iterator<Item = &Product> + '_ {
        self.visible.iter().map(|&i| &self.source[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn page(&self) -> Page<&Product> {
        let start = (self.page_index * self.page_size).min(self.visible.len());
        let end = (start + self.page_size).min(self.visible.len());
        let items = self.visible[start..end]
            .iter()
            .map(|&i| &self.source[i])
            .collect();
        Page::new(items, self.visible.len(), self.page_index, self.page_size)
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Jump to a page; out-of-range indices land on the last page.
    pub fn set_page(&mut self, index: usize) {
        self.page_index = index;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page_index + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page_index.saturating_sub(1));
    }

    /// Change the page size, keeping the first row of the current page on screen.
    pub fn set_page_size(&mut self, size: usize) {
        let size = size.max(1);
        let first_row = self.page_index * self.page_size;
        self.page_size = size;
        self.page_index = first_row / size;
        self.clamp_page();
    }

    /// Delete a product after the user confirms.
    ///
    /// On failure the collection is left as it was, except that a product
    /// the server no longer knows about is dropped from the list.
    pub async fn delete(&mut self, id: &str) -> Result<DeleteOutcome> {
        if self.scope.is_torn_down() {
            return Err(Error::ViewClosed);
        }

        let name = self
            .source
            .iter()
            .find(|p| p.id_str() == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string());

        if !self
            .shell
            .confirm(&format!("Are you sure you want to delete {}?", name))
        {
            debug!("Delete of {} declined", id);
            return Ok(DeleteOutcome::Declined);
        }

        match self.scope.run(self.repository.delete(id)).await {
            Ok(()) => {
                info!("Deleted product {}", id);
                self.remove(id);
                self.shell
                    .notify("Product deleted successfully", self.notify_duration_ms);
                Ok(DeleteOutcome::Deleted)
            }
            Err(Error::ViewClosed) => Err(Error::ViewClosed),
            Err(e) => {
                warn!("Failed to delete product {}: {}", id, e);
                if e.is_not_found() {
                    self.remove(id);
                }
                self.shell.notify(&e.user_message(), self.notify_duration_ms);
                Err(e)
            }
        }
    }

    fn remove(&mut self, id: &str) {
        self.source.retain(|p| p.id_str() != id);
        self.recompute();
    }

    fn recompute(&mut self) {
        let mut visible: Vec<usize> = self
            .source
            .iter()
            .enumerate()
            .filter(|(_, p)| matches_filter(p, &self.filter))
            .map(|(i, _)| i)
            .collect();

        if let Some((key, direction)) = self.sort {
            let source = &self.source;
            // sort_by is stable, so equal keys keep their source order
            visible.sort_by(|&a, &b| {
                let ord = compare_by(&source[a], &source[b], key);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        self.visible = visible;
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let last = page_count(self.visible.len(), self.page_size) - 1;
        self.page_index = self.page_index.min(last);
    }
}

/// `filter` is already trimmed and lower-cased.
fn matches_filter(product: &Product, filter: &str) -> bool {
    filter.is_empty()
        || product.name.to_lowercase().contains(filter)
        || product.category.to_lowercase().contains(filter)
        || product.price.to_string().contains(filter)
}

fn compare_by(a: &Product, b: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Category => a.category.cmp(&b.category),
        SortKey::Price => a.price.total_cmp(&b.price),
    }
}
