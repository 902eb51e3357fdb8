use tide::{Request, Response};

use crate::models::DEFAULT_OWNER;

pub(in super::super) fn mount(route: &mut tide::Server<crate::State>) {
    route.at("/gallery.js").get(default_gallery);
    route.at("/flickr/:user/gallery.js").get(user_gallery);
}

async fn default_gallery(req: Request<crate::State>) -> tide::Result<Response> {
    render_gallery(req.state(), DEFAULT_OWNER).await
}

async fn user_gallery(req: Request<crate::State>) -> tide::Result<Response> {
    let user = super::decoded_param(&req, "user")?;
    render_gallery(req.state(), &user).await
}

/// The gallery player script with the owner's sources and images baked in.
async fn render_gallery(state: &crate::State, owner: &str) -> tide::Result<Response> {
    let gallery = state.aggregator.aggregate(owner).await;

    let mut context = tera::Context::new();
    context.insert("sources", &serde_json::to_string(&gallery.sources)?);
    context.insert("images", &serde_json::to_string(&gallery.images)?);

    let body = state.tera.render("gallery.js", &context)?;
    let res = Response::builder(tide::http::StatusCode::Ok)
        .content_type(tide::http::mime::JAVASCRIPT)
        .body(body)
        .build();
    Ok(res)
}
