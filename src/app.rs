//! Terminal front-end.
//!
//! Each command loads one view model, renders it as text, and then follows
//! any navigation the view model requested.

use std::sync::Arc;

use catalog_core::{Product, SortDirection, SortKey, CATEGORIES};
use clap::Subcommand;
use tracing::debug;

use crate::config::Config;
use crate::dashboard::{format_currency, DashboardViewModel};
use crate::error::{Error, Result};
use crate::form::FormViewModel;
use crate::list::ListViewModel;
use crate::repository::ProductRepository;
use crate::shell::terminal::TerminalShell;
use crate::shell::Route;

const CHART_WIDTH: usize = 40;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show totals, average price and the category chart
    Dashboard,

    /// List products
    List {
        /// Case-insensitive text matched against name, category and price
        #[arg(short, long)]
        filter: Option<String>,

        /// Column to sort by (name, category, price)
        #[arg(short, long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show one product
    Show { id: String },

    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        price: String,
    },

    /// Edit a product; omitted fields keep their value
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Option<String>,
    },

    /// Delete a product
    Delete { id: String },

    /// Open a view by path, e.g. /products or /products/4/edit
    Open { path: String },

    /// List the accepted categories
    Categories,
}

#[derive(Debug, Default)]
struct ListArgs {
    filter: Option<String>,
    sort: Option<(SortKey, SortDirection)>,
    page_index: usize,
    page_size: Option<usize>,
}

pub struct App {
    config: Config,
    repository: Arc<dyn ProductRepository>,
    shell: Arc<TerminalShell>,
}

impl App {
    pub fn new(
        config: Config,
        repository: Arc<dyn ProductRepository>,
        shell: Arc<TerminalShell>,
    ) -> Self {
        Self {
            config,
            repository,
            shell,
        }
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Dashboard => self.dashboard().await?,
            Command::List {
                filter,
                sort,
                desc,
                page,
                page_size,
            } => {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                self.list(ListArgs {
                    filter,
                    sort: sort.map(|key| (key, direction)),
                    page_index: page.saturating_sub(1),
                    page_size,
                })
                .await?
            }
            Command::Show { id } => self.show(&id).await?,
            Command::Create {
                name,
                category,
                price,
            } => {
                let mut form = self.form();
                form.set_name(&name);
                form.set_category(&category);
                form.set_price(&price);
                let saved = form.submit().await?;
                println!("Created product {}", saved.id_str());
            }
            Command::Edit {
                id,
                name,
                category,
                price,
            } => {
                let mut form = self.form();
                form.load(&id).await?;
                if let Some(name) = name {
                    form.set_name(&name);
                }
                if let Some(category) = category {
                    form.set_category(&category);
                }
                if let Some(price) = price {
                    form.set_price(&price);
                }
                let saved = form.submit().await?;
                println!("Updated product {}", saved.id_str());
            }
            Command::Delete { id } => {
                let mut list = self.list_view();
                list.reload().await?;
                list.delete(&id).await?;
            }
            Command::Open { path } => {
                let route = Route::parse(&path).ok_or_else(|| Error::UnknownRoute(path.clone()))?;
                self.open(route).await?;
            }
            Command::Categories => {
                for category in CATEGORIES {
                    println!("{}", category);
                }
            }
        }

        if let Some(route) = self.shell.take_route() {
            debug!("Following navigation to {}", route);
            println!();
            self.open(route).await?;
        }
        Ok(())
    }

    async fn open(&self, route: Route) -> Result<()> {
        match route {
            Route::Dashboard => self.dashboard().await,
            Route::Products => self.list(ListArgs::default()).await,
            Route::NewProduct => {
                print_form(&self.form());
                println!("Categories: {}", CATEGORIES.join(", "));
                Ok(())
            }
            Route::EditProduct(id) => self.show(&id).await,
        }
    }

    fn list_view(&self) -> ListViewModel {
        ListViewModel::new(self.repository.clone(), self.shell.clone(), &self.config)
    }

    fn form(&self) -> FormViewModel {
        FormViewModel::new(self.repository.clone(), self.shell.clone(), &self.config)
    }

    async fn dashboard(&self) -> Result<()> {
        let mut dashboard =
            DashboardViewModel::new(self.repository.clone(), self.shell.clone(), &self.config);
        dashboard.load().await?;

        if let Some(stats) = dashboard.stats() {
            println!("Total Products  {}", stats.total_products);
            println!("Average Price   {}", format_currency(stats.average_price));
            println!("Total Value     {}", format_currency(stats.total_value));
            println!();
            println!("Category Distribution");
            println!("{}", dashboard.chart().render(CHART_WIDTH));
        }
        Ok(())
    }

    async fn list(&self, args: ListArgs) -> Result<()> {
        let mut list = self.list_view();
        list.reload().await?;

        if let Some(size) = args.page_size {
            list.set_page_size(size);
        }
        if let Some(filter) = &args.filter {
            list.set_filter(filter);
        }
        if let Some((key, direction)) = args.sort {
            list.set_sort(key, direction);
        }
        list.set_page(args.page_index);

        let page = list.page();
        if page.items.is_empty() {
            if list.filter().is_empty() {
                println!("No products");
            } else {
                println!("No products matching the filter \"{}\"", list.filter());
            }
            return Ok(());
        }

        print_table(&page.items);
        println!();
        println!(
            "Page {} of {} ({} products)",
            page.page_index + 1,
            page.total_pages,
            page.total
        );
        if page.has_previous() {
            println!("Previous: --page {}", page.page_index);
        }
        if page.has_next() {
            println!("Next: --page {}", page.page_index + 2);
        }
        Ok(())
    }

    async fn show(&self, id: &str) -> Result<()> {
        let mut form = self.form();
        form.load(id).await?;
        print_form(&form);
        Ok(())
    }
}

fn print_form(form: &FormViewModel) {
    println!("{}", form.title());
    println!("  Name:     {}", form.name());
    println!("  Category: {}", form.category());
    println!("  Price:    {}", form.price_text());
    for error in form.errors().as_slice() {
        println!("  ! {}", error);
    }
}

fn print_table(products: &[&Product]) {
    let id_width = column_width("ID", products.iter().map(|p| p.id_str()));
    let name_width = column_width("Name", products.iter().map(|p| p.name.as_str()));
    let category_width = column_width("Category", products.iter().map(|p| p.category.as_str()));

    println!(
        "{:<iw$}  {:<nw$}  {:<cw$}  {:>12}",
        "ID",
        "Name",
        "Category",
        "Price",
        iw = id_width,
        nw = name_width,
        cw = category_width
    );
    for product in products {
        println!(
            "{:<iw$}  {:<nw$}  {:<cw$}  {:>12}",
            product.id_str(),
            product.name,
            product.category,
            format_currency(product.price),
            iw = id_width,
            nw = name_width,
            cw = category_width
        );
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}
