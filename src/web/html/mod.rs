use html_minifier::HTMLMinifier;
use tide::{Request, Response};

pub(in super::super) fn mount(route: &mut tide::Server<crate::State>) {
    route.at("/").get(display);

    route.at("/flickr/:user").get(user_display);
    route.at("/flickr/:user/").get(user_display);
}

/// Whitespace-collapsed copy of a rendered page, or the page itself when it can't be minified.
fn minify(page: String) -> String {
    let mut minifier = HTMLMinifier::new();
    if let Err(err) = minifier.digest(&page) {
        tracing::warn!("serving unminified page: {}", err);
        return page;
    }

    match String::from_utf8(minifier.get_html().to_vec()) {
        Ok(minified) => minified,
        Err(err) => {
            tracing::warn!("serving unminified page: {}", err);
            page
        },
    }
}

fn render_display(state: &crate::State, user: Option<&str>) -> tide::Result<Response> {
    let mut context = tera::Context::new();
    context.insert("cache_buster", &state.cache_busting_string);
    context.insert("user", &user);
    match user {
        Some(user) => context.insert("title", &format!("{}'s photos", user)),
        None => context.insert("title", "gallery"),
    }

    let page = state.tera.render("display.html", &context)?;
    let res = Response::builder(tide::http::StatusCode::Ok)
        .content_type(tide::http::mime::HTML)
        .body(minify(page))
        .build();
    Ok(res)
}

async fn display(req: Request<crate::State>) -> tide::Result<Response> {
    render_display(req.state(), None)
}

async fn user_display(req: Request<crate::State>) -> tide::Result<Response> {
    let user = super::decoded_param(&req, "user")?;
    render_display(req.state(), Some(&user))
}
