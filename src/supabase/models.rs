/// Sortierung einer Select-Abfrage
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// Select-Abfrage gegen eine Tabelle (`select`, `order`, `limit`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    pub columns: Option<String>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    /// Alle Spalten, keine Sortierung, kein Limit
    pub fn all() -> Self {
        Self::default()
    }

    /// Spaltenliste im `select`-Format, z.B. `dia,tel`
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-Parameter im Format der REST API
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![(
            "select",
            self.columns.clone().unwrap_or_else(|| "*".to_string()),
        )];

        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order", format!("{}.{}", order.column, direction)));
        }

        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        params
    }
}
