//! Dashboard view model: summary cards and the category bar chart.

use std::sync::Arc;

use catalog_core::ProductStats;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::repository::ProductRepository;
use crate::shell::Shell;
use crate::teardown::{TeardownHandle, ViewScope};

const BAR: char = '█';

/// Horizontal bar chart of products per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarChart {
    pub series: String,
    pub labels: Vec<String>,
    pub data: Vec<usize>,
}

impl BarChart {
    pub fn from_stats(stats: &ProductStats) -> Self {
        let (labels, data) = stats
            .category_distribution
            .iter()
            .map(|c| (c.category.clone(), c.count))
            .unzip();
        Self {
            series: "Products".to_string(),
            labels,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Draw one row per category; the longest bar is `width` cells.
    pub fn render(&self, width: usize) -> String {
        if self.is_empty() {
            return "No products".to_string();
        }

        let label_width = self.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = self.data.iter().copied().max().unwrap_or(0).max(1);

        self.labels
            .iter()
            .zip(&self.data)
            .map(|(label, &count)| {
                let mut len = count * width / max;
                if count > 0 && len == 0 {
                    len = 1;
                }
                let bar: String = std::iter::repeat(BAR).take(len).collect();
                format!("{:<lw$} | {} {}", label, bar, count, lw = label_width)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Format an amount the way the summary cards show it, e.g. `$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

pub struct DashboardViewModel {
    repository: Arc<dyn ProductRepository>,
    shell: Arc<dyn Shell>,
    scope: ViewScope,
    notify_duration_ms: u64,
    stats: Option<ProductStats>,
    chart: BarChart,
}

impl DashboardViewModel {
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
            stats: None,
            chart: BarChart::default(),
        }
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub async fn load(&mut self) -> Result<()> {
        match self.scope.run(self.repository.list()).await {
            Ok(products) => {
                let stats = ProductStats::from_products(&products);
                debug!(
                    "Dashboard: {} products in {} categories",
                    stats.total_products,
                    stats.category_distribution.len()
                );
                self.chart = BarChart::from_stats(&stats);
                self.stats = Some(stats);
                Ok(())
            }
            Err(Error::ViewClosed) => Err(Error::ViewClosed),
            Err(e) => {
                warn!("Failed to load product statistics: {}", e);
                self.shell.notify(&e.user_message(), self.notify_duration_ms);
                Err(e)
            }
        }
    }

    /// `None` until the first successful load.
    pub fn stats(&self) -> Option<&ProductStats> {
        self.stats.as_ref()
    }

    pub fn chart(&self) -> &BarChart {
        &self.chart
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::Product;

    use super::*;
    use crate::repository::memory::MemoryRepository;
    use crate::shell::recording::RecordingShell;

    fn dashboard(
        products: Vec<Product>,
    ) -> (DashboardViewModel, Arc<MemoryRepository>, Arc<RecordingShell>) {
        let repo = Arc::new(MemoryRepository::with_products(products));
        let shell = Arc::new(RecordingShell::new(true));
        let vm = DashboardViewModel::new(repo.clone(), shell.clone(), &Config::default());
        (vm, repo, shell)
    }

    #[tokio::test]
    async fn load_builds_stats_and_chart() {
        let (mut vm, _, _) = dashboard(vec![
            Product::new("Dune", "Books", 10.0),
            Product::new("Emma", "Books", 20.0),
            Product::new("Yo-yo", "Toys", 5.0),
        ]);
        assert!(vm.stats().is_none());

        vm.load().await.unwrap();

        let stats = vm.stats().unwrap();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.total_value, 35.0);
        assert_eq!(vm.chart().labels, ["Books", "Toys"]);
        assert_eq!(vm.chart().data, [2, 1]);
        assert_eq!(vm.chart().series, "Products");
    }

    #[tokio::test]
    async fn empty_catalog_has_zero_average() {
        let (mut vm, _, _) = dashboard(Vec::new());
        vm.load().await.unwrap();

        assert_eq!(vm.stats().unwrap().average_price, 0.0);
        assert_eq!(vm.chart().render(20), "No products");
    }

    #[tokio::test]
    async fn failed_load_notifies_and_keeps_previous_stats() {
        let (mut vm, repo, shell) = dashboard(vec![Product::new("Dune", "Books", 10.0)]);
        vm.load().await.unwrap();
        repo.set_offline(true);

        assert!(vm.load().await.unwrap_err().is_transport());
        assert_eq!(vm.stats().unwrap().total_products, 1);
        assert_eq!(shell.messages().len(), 1);
    }

    #[test]
    fn bars_scale_to_width() {
        let chart = BarChart {
            series: "Products".into(),
            labels: vec!["Books".into(), "Toys".into(), "Sports".into()],
            data: vec![4, 2, 0],
        };
        let rendered = chart.render(8);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Books  | ████████ 4");
        assert_eq!(lines[1].matches(BAR).count(), 4);
        assert_eq!(lines[2], "Sports |  0");
    }

    #[test]
    fn tiny_counts_still_get_a_bar() {
        let chart = BarChart {
            series: "Products".into(),
            labels: vec!["Books".into(), "Toys".into()],
            data: vec![100, 1],
        };
        let rendered = chart.render(10);
        assert_eq!(rendered.lines().nth(1).unwrap().matches(BAR).count(), 1);
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(11.666666), "$11.67");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-5.0), "-$5.00");
    }
}
