use super::model::OrderStatus;

/// Query options for the order list endpoints. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<OrderStatus>,
    pub provider: Option<String>,
    pub product_type: Option<String>,
}

impl OrderFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    /// Query pairs for the set options.
    ///
    /// Zero page/limit and blank strings count as unset and are not sent.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page.filter(|&p| p > 0) {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|&l| l > 0) {
            query.push(("limit", limit.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(provider) = non_blank(self.provider.as_deref()) {
            query.push(("provider", provider.to_string()));
        }
        if let Some(product_type) = non_blank(self.product_type.as_deref()) {
            query.push(("type", product_type.to_string()));
        }
        query
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
