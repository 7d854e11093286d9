//! Product catalog screen

use crate::models::product::{Product, ProductDraft};
use crate::models::translation::{self, Translation};
use crate::services::{Attachment, ProductService, ServiceFactory};
use crate::session::Session;
use crate::utils::errors::ValidationError;
use crate::utils::helpers::contains_ignore_case;
use crate::utils::logging::log_operator_action;
use super::{load_into, surface_error, ListState, Notices};

const SCREEN: &str = "products";

/// Create or edit dialog state
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    /// `None` while creating
    pub editing: Option<String>,
    pub draft: ProductDraft,
    pub attachment: Option<Attachment>,
}

impl ProductForm {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn translation_mut(&mut self, language: &str) -> &mut Translation {
        let translations = &mut self.draft.translations;
        let index = match translations.iter().position(|t| t.language == language) {
            Some(index) => index,
            None => {
                translations.push(Translation::blank(language));
                translations.len() - 1
            }
        };
        &mut translations[index]
    }
}

#[derive(Debug)]
pub struct ProductsScreen {
    service: ProductService,
    session: Session,
    list: ListState<Product>,
    /// Matched against every translated name
    pub search: String,
    form: Option<ProductForm>,
    notices: Notices,
}

impl ProductsScreen {
    pub fn new(services: &ServiceFactory) -> Self {
        Self {
            service: services.product_service.clone(),
            session: services.session().clone(),
            list: ListState::default(),
            search: String::new(),
            form: None,
            notices: Notices::default(),
        }
    }

    /// `GET /products`
    pub async fn load(&mut self) -> bool {
        load_into(&mut self.list, &self.session, &mut self.notices, SCREEN, self.service.list()).await
    }

    pub fn list(&self) -> &ListState<Product> {
        &self.list
    }

    pub fn products(&self) -> &[Product] {
        self.list.items()
    }

    pub fn visible(&self) -> Vec<&Product> {
        self.products()
            .iter()
            .filter(|p| {
                self.search.is_empty()
                    || p.translations.iter().any(|t| contains_ignore_case(&t.name, &self.search))
            })
            .collect()
    }

    /// Display name in `language`, falling back to the first translation
    pub fn display_name<'a>(product: &'a Product, language: &str) -> &'a str {
        translation::pick(&product.translations, language)
            .map(|t| t.name.as_str())
            .unwrap_or_default()
    }

    pub fn open_create(&mut self) {
        self.form = Some(ProductForm {
            editing: None,
            draft: ProductDraft::default(),
            attachment: None,
        });
    }

    pub fn open_edit(&mut self, product_id: &str) -> bool {
        match self.list.items().iter().find(|p| p.id == product_id) {
            Some(product) => {
                self.form = Some(ProductForm {
                    editing: Some(product.id.clone()),
                    draft: product.to_draft(),
                    attachment: None,
                });
                true
            }
            None => {
                self.notices.error(format!("Unknown product {}", product_id));
                false
            }
        }
    }

    pub fn form(&self) -> Option<&ProductForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ProductForm> {
        self.form.as_mut()
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Upload the attachment if any, then POST or PUT the full product
    pub async fn submit(&mut self) -> bool {
        let Some(form) = self.form.clone() else {
            self.notices.error(ValidationError::MissingField("product").to_string());
            return false;
        };

        let (action, result) = match &form.editing {
            Some(id) => {
                log_operator_action(SCREEN, "update", Some(id), None);
                ("update", self.service.update(id, form.draft, form.attachment).await)
            }
            None => {
                log_operator_action(SCREEN, "create", None, None);
                ("create", self.service.create(form.draft, form.attachment).await)
            }
        };

        match result {
            Ok(_) => {
                self.notices.success(if action == "update" { "Product updated" } else { "Product created" });
                self.close_form();
                self.load().await;
                true
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, action, &e);
                false
            }
        }
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_mut_adds_missing_language() {
        let mut form = ProductForm {
            editing: None,
            draft: ProductDraft::default(),
            attachment: None,
        };
        form.translation_mut("uz").name = "Premium tarif".to_string();
        form.translation_mut("en").name = "Premium".to_string();

        assert_eq!(form.draft.translations.len(), 2);
        assert_eq!(form.draft.translations[0].name, "Premium");
        assert!(!form.is_editing());
    }
}
