//! Product form view model.
//!
//! Backs the create and edit screens. Field values are kept exactly as typed
//! and validation re-runs after every change; submission is refused locally
//! while any rule fails, so invalid input never reaches the repository.

use std::fmt;
use std::sync::Arc;

use catalog_core::{is_known_category, Product};
use jiff::Timestamp;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::repository::ProductRepository;
use crate::shell::{Route, Shell};
use crate::teardown::{TeardownHandle, ViewScope};

pub const MIN_NAME_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Category,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    UnknownCategory,
    NotANumber,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub rule: Rule,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            Field::Name => "Name",
            Field::Category => "Category",
            Field::Price => "Price",
        };
        match self.rule {
            Rule::Required => write!(f, "{} is required", field),
            Rule::MinLength(n) => write!(f, "{} must be at least {} characters", field, n),
            Rule::UnknownCategory => write!(f, "{} must be one of the listed categories", field),
            Rule::NotANumber => write!(f, "{} must be a number", field),
            Rule::Negative => write!(f, "{} must not be negative", field),
        }
    }
}

/// Every rule the current field values break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

/// Check raw form input against the product rules.
pub fn validate_fields(name: &str, category: &str, price: &str) -> ValidationErrors {
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push(FieldError {
            field: Field::Name,
            rule: Rule::Required,
        });
    } else if name.chars().count() < MIN_NAME_LEN {
        errors.push(FieldError {
            field: Field::Name,
            rule: Rule::MinLength(MIN_NAME_LEN),
        });
    }

    if category.is_empty() {
        errors.push(FieldError {
            field: Field::Category,
            rule: Rule::Required,
        });
    } else if !is_known_category(category) {
        errors.push(FieldError {
            field: Field::Category,
            rule: Rule::UnknownCategory,
        });
    }

    if let Err(rule) = parse_price(price) {
        errors.push(FieldError {
            field: Field::Price,
            rule,
        });
    }

    ValidationErrors(errors)
}

fn parse_price(text: &str) -> std::result::Result<f64, Rule> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Rule::Required);
    }
    let value: f64 = text.parse().map_err(|_| Rule::NotANumber)?;
    if !value.is_finite() {
        return Err(Rule::NotANumber);
    }
    if value < 0.0 {
        return Err(Rule::Negative);
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

pub struct FormViewModel {
    repository: Arc<dyn ProductRepository>,
    shell: Arc<dyn Shell>,
    scope: ViewScope,
    notify_duration_ms: u64,

    name: String,
    category: String,
    price: String,
    mode: FormMode,
    created_at: Option<Timestamp>,
    errors: ValidationErrors,
}

impl FormViewModel {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        shell: Arc<dyn Shell>,
        config: &Config,
    ) -> Self {
        let mut form = Self {
            repository,
            shell,
            scope: ViewScope::new(),
            notify_duration_ms: config.notify_duration_ms,
            name: String::new(),
            category: String::new(),
            price: "0".to_string(),
            mode: FormMode::Create,
            created_at: None,
            errors: ValidationErrors::default(),
        };
        form.validate();
        form
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.scope.handle()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Price as typed.
    pub fn price_text(&self) -> &str {
        &self.price
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.validate();
    }

    pub fn set_category(&mut self, category: &str) {
        self.category = category.to_string();
        self.validate();
    }

    pub fn set_price(&mut self, text: &str) {
        self.price = text.to_string();
        self.validate();
    }

    pub fn set_price_value(&mut self, price: f64) {
        self.set_price(&price.to_string());
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit_mode() {
            "Edit Product"
        } else {
            "Create Product"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit_mode() {
            "Update"
        } else {
            "Create"
        }
    }

    /// Re-run every rule; `true` when the form may be submitted.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_fields(&self.name, &self.category, &self.price);
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn can_submit(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fill the form from an existing product and switch to edit mode.
    ///
    /// On failure the form stays in create mode.
    pub async fn load(&mut self, id: &str) -> Result<()> {
        match self.scope.run(self.repository.get(id)).await {
            Ok(product) => {
                self.name = product.name;
                self.category = product.category;
                self.price = product.price.to_string();
                self.created_at = product.created_at;
                self.mode = FormMode::Edit { id: id.to_string() };
                self.validate();
                Ok(())
            }
            Err(Error::ViewClosed) => Err(Error::ViewClosed),
            Err(e) => {
                warn!("Failed to load product {}: {}", id, e);
                self.reset();
                self.shell.notify(&e.user_message(), self.notify_duration_ms);
                Err(e)
            }
        }
    }

    /// Back to an empty create form.
    fn reset(&mut self) {
        self.name.clear();
        self.category.clear();
        self.price = "0".to_string();
        self.mode = FormMode::Create;
        self.created_at = None;
        self.validate();
    }

    pub async fn submit(&mut self) -> Result<Product> {
        self.submit_at(Timestamp::now()).await
    }

    /// Save the form, stamping it with `now`.
    ///
    /// Creating sets both timestamps; editing keeps the original creation
    /// time. Success navigates back to the list. Failure keeps every field
    /// as entered.
    pub async fn submit_at(&mut self, now: Timestamp) -> Result<Product> {
        if !self.validate() {
            return Err(Error::Validation(self.errors.clone()));
        }
        let price =
            parse_price(&self.price).map_err(|_| Error::Validation(self.errors.clone()))?;

        let mut product = Product::new(self.name.clone(), self.category.clone(), price);
        product.updated_at = Some(now);
        let request = match &self.mode {
            FormMode::Create => {
                product.created_at = Some(now);
                self.repository.create(&product)
            }
            FormMode::Edit { id } => {
                product.id = Some(id.clone());
                product.created_at = self.created_at;
                self.repository.update(&product)
            }
        };

        match self.scope.run(request).await {
            Ok(saved) => {
                info!("Saved product {}", saved.id_str());
                self.shell.navigate(Route::Products);
                Ok(saved)
            }
            Err(Error::ViewClosed) => Err(Error::ViewClosed),
            Err(e) => {
                warn!("Failed to save product: {}", e);
                self.shell.notify(&e.user_message(), self.notify_duration_ms);
                Err(e)
            }
        }
    }

    pub fn cancel(&self) {
        self.shell.navigate(Route::Products);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryRepository;
    use crate::shell::recording::RecordingShell;

    fn at(second: i64) -> Timestamp {
        Timestamp::from_second(second).unwrap()
    }

    fn form(
        products: Vec<Product>,
    ) -> (FormViewModel, Arc<MemoryRepository>, Arc<RecordingShell>) {
        let repo = Arc::new(MemoryRepository::with_products(products));
        let shell = Arc::new(RecordingShell::new(true));
        let vm = FormViewModel::new(repo.clone(), shell.clone(), &Config::default());
        (vm, repo, shell)
    }

    fn fill(vm: &mut FormViewModel, name: &str, category: &str, price: &str) {
        vm.set_name(name);
        vm.set_category(category);
        vm.set_price(price);
    }

    fn rules(errors: &ValidationErrors) -> Vec<(Field, Rule)> {
        errors.as_slice().iter().map(|e| (e.field, e.rule)).collect()
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_fields("Lamp", "Home & Garden", "19.99").is_empty());
        assert!(validate_fields("Pen", "Books", "0").is_empty());
    }

    #[test]
    fn each_rule_is_reported() {
        assert_eq!(
            rules(&validate_fields("", "", "")),
            [
                (Field::Name, Rule::Required),
                (Field::Category, Rule::Required),
                (Field::Price, Rule::Required),
            ]
        );
        assert_eq!(
            rules(&validate_fields("ab", "Food", "-1")),
            [
                (Field::Name, Rule::MinLength(3)),
                (Field::Category, Rule::UnknownCategory),
                (Field::Price, Rule::Negative),
            ]
        );
        assert_eq!(
            rules(&validate_fields("Lamp", "Books", "cheap")),
            [(Field::Price, Rule::NotANumber)]
        );
        assert_eq!(
            rules(&validate_fields("Lamp", "Books", "NaN")),
            [(Field::Price, Rule::NotANumber)]
        );
    }

    #[test]
    fn messages_read_like_the_form() {
        let errors = validate_fields("ab", "", "5");
        assert_eq!(
            errors.to_string(),
            "Name must be at least 3 characters; Category is required"
        );
        assert_eq!(
            errors.for_field(Field::Category).unwrap().to_string(),
            "Category is required"
        );
        assert!(errors.for_field(Field::Price).is_none());
    }

    #[test]
    fn every_change_revalidates() {
        let (mut vm, _, _) = form(Vec::new());
        assert!(!vm.can_submit());
        assert_eq!(vm.price_text(), "0");

        fill(&mut vm, "Lamp", "Home & Garden", "12");
        assert!(vm.can_submit());

        vm.set_price("-3");
        assert!(!vm.can_submit());
        assert_eq!(vm.errors().for_field(Field::Price).unwrap().rule, Rule::Negative);

        vm.set_price_value(3.5);
        assert!(vm.can_submit());
        assert_eq!(vm.price_text(), "3.5");
    }

    #[tokio::test]
    async fn invalid_submit_never_reaches_repository() {
        let (mut vm, repo, shell) = form(Vec::new());
        vm.set_name("ab");

        let err = vm.submit().await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(repo.snapshot().await.is_empty());
        assert!(shell.routes().is_empty());
        assert_eq!(vm.name(), "ab");
    }

    #[tokio::test]
    async fn create_stamps_both_timestamps_and_navigates() {
        let (mut vm, repo, shell) = form(Vec::new());
        fill(&mut vm, "Lamp", "Home & Garden", "19.5");
        assert_eq!(vm.title(), "Create Product");
        assert_eq!(vm.submit_label(), "Create");

        let saved = vm.submit_at(at(1_700_000_000)).await.unwrap();

        assert_eq!(saved.id.as_deref(), Some("1"));
        assert_eq!(saved.created_at, Some(at(1_700_000_000)));
        assert_eq!(saved.updated_at, Some(at(1_700_000_000)));
        assert_eq!(repo.snapshot().await, vec![saved]);
        assert_eq!(shell.routes(), [Route::Products]);
    }

    #[tokio::test]
    async fn edit_keeps_creation_time() {
        let mut existing = Product::new("Desk", "Home & Garden", 120.0).with_id("4");
        existing.created_at = Some(at(1_600_000_000));
        existing.updated_at = Some(at(1_600_000_000));
        let (mut vm, repo, shell) = form(vec![existing]);

        vm.load("4").await.unwrap();
        assert_eq!(vm.mode(), &FormMode::Edit { id: "4".into() });
        assert_eq!(vm.title(), "Edit Product");
        assert_eq!(vm.submit_label(), "Update");
        assert_eq!(vm.name(), "Desk");
        assert_eq!(vm.price_text(), "120");
        assert!(vm.can_submit());

        vm.set_price("99.9");
        let saved = vm.submit_at(at(1_700_000_000)).await.unwrap();

        assert_eq!(saved.id.as_deref(), Some("4"));
        assert_eq!(saved.created_at, Some(at(1_600_000_000)));
        assert_eq!(saved.updated_at, Some(at(1_700_000_000)));
        assert_eq!(repo.snapshot().await[0].price, 99.9);
        assert_eq!(shell.routes(), [Route::Products]);
    }

    #[tokio::test]
    async fn failed_load_stays_in_create_mode() {
        let (mut vm, _, shell) = form(Vec::new());

        let err = vm.load("42").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(vm.mode(), &FormMode::Create);
        assert_eq!(shell.messages(), ["Product 42 no longer exists"]);
    }

    #[tokio::test]
    async fn failed_reload_drops_previous_product() {
        let (mut vm, repo, _) = form(vec![Product::new("Desk", "Home & Garden", 120.0)]);
        vm.load("1").await.unwrap();
        assert!(vm.is_edit_mode());

        assert!(vm.load("missing").await.unwrap_err().is_not_found());

        assert_eq!(vm.mode(), &FormMode::Create);
        assert_eq!(vm.name(), "");
        assert_eq!(vm.category(), "");
        assert_eq!(vm.price_text(), "0");
        assert!(!vm.can_submit());

        assert!(matches!(vm.submit().await, Err(Error::Validation(_))));
        assert_eq!(repo.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_submit_keeps_input() {
        let (mut vm, repo, shell) = form(Vec::new());
        fill(&mut vm, "Lamp", "Home & Garden", "19.5");
        repo.set_offline(true);

        let err = vm.submit().await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(vm.name(), "Lamp");
        assert_eq!(vm.category(), "Home & Garden");
        assert_eq!(vm.price_text(), "19.5");
        assert_eq!(shell.messages().len(), 1);
        assert!(shell.routes().is_empty());
    }

    #[tokio::test]
    async fn torn_down_form_does_not_navigate() {
        let (mut vm, repo, shell) = form(Vec::new());
        fill(&mut vm, "Lamp", "Home & Garden", "19.5");
        vm.teardown_handle().teardown();

        assert!(matches!(vm.submit().await, Err(Error::ViewClosed)));
        assert!(repo.snapshot().await.is_empty());
        assert!(shell.routes().is_empty());
    }

    #[test]
    fn cancel_goes_back_to_list() {
        let (vm, _, shell) = form(Vec::new());
        vm.cancel();
        assert_eq!(shell.routes(), [Route::Products]);
    }
}
