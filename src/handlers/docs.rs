use axum::response::{Html, Json};
use serde_json::Value;

use crate::api::openapi;
use crate::config::config;

/// GET /openapi.json - The OpenAPI 3 document for the mounted routes
pub async fn openapi_json() -> Json<Value> {
    Json(openapi::document(config()))
}

/// GET /docs - Swagger UI driven by /openapi.json
pub async fn swagger_ui() -> Html<String> {
    let site = &config().site;
    Html(format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <title>{title} - Swagger UI</title>
    <meta charset="utf-8"/>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        SwaggerUIBundle({{
            url: "{openapi_url}",
            dom_id: "#swagger-ui",
            deepLinking: true,
            layout: "BaseLayout"
        }});
    </script>
</body>
</html>"##,
        title = site.title,
        openapi_url = site.openapi_url,
    ))
}

/// GET /redoc - ReDoc driven by /openapi.json
pub async fn redoc() -> Html<String> {
    let site = &config().site;
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title} - ReDoc</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
    <redoc spec-url="{openapi_url}"></redoc>
    <script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
</body>
</html>"#,
        title = site.title,
        openapi_url = site.openapi_url,
    ))
}
