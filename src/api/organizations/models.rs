use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 100, message = "Name cannot be more than 100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(nested)]
    pub contact: Option<ContactInput>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 100, message = "Name cannot be more than 100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(nested)]
    pub contact: Option<ContactInput>,
}
