use sangathan_domain::MenuItem;
use serde::Serialize;
use ts_rs::TS;

/// Sidebar menu node serialized for the dashboard.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../dashboard/src/api/generated/menu-item-response.ts"
)]
pub struct MenuItemResponse {
    pub logical_name: String,
    pub label: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub children: Vec<MenuItemResponse>,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            logical_name: item.logical_name().to_owned(),
            label: item.label().to_owned(),
            path: item.path().map(ToOwned::to_owned),
            icon: item.icon().map(ToOwned::to_owned),
            children: item
                .children()
                .iter()
                .cloned()
                .map(MenuItemResponse::from)
                .collect(),
        }
    }
}
