use tide::Request;

pub mod html;
pub mod script;

pub(super) fn mount(app: &mut tide::Server<crate::State>) {
    html::mount(app);
    script::mount(app);
}

fn decoded_param(req: &Request<crate::State>, name: &str) -> tide::Result<String> {
    let raw = req.param(name)?;
    Ok(percent_encoding::percent_decode_str(raw)
        .decode_utf8_lossy()
        .to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use tide::http::{Method, Request, Response, Url};

    use super::*;
    use crate::flickr::testing::{record, Call, FakeFlickr};
    use crate::models::{Aggregator, KeepOrder};
    use crate::State;

    fn app(fake: &FakeFlickr) -> tide::Server<State> {
        let template_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        let (tera, cache_busting_string) = crate::load_templates(&template_path).unwrap();

        let state = State {
            tera: Arc::new(tera),
            aggregator: Arc::new(
                Aggregator::new(fake.clone(), "72157634011366503").with_order(KeepOrder),
            ),
            cache_busting_string,
        };
        let mut app = tide::with_state(state);
        mount(&mut app);
        app
    }

    async fn get(app: &tide::Server<State>, path: &str) -> (Response, String) {
        let url = Url::parse(&format!("http://localhost{}", path)).unwrap();
        let mut res: Response = app.respond(Request::new(Method::Get, url)).await.unwrap();
        let body = res.body_string().await.unwrap();
        (res, body)
    }

    #[async_std::test]
    async fn gallery_script_embeds_payload() {
        let fake = FakeFlickr {
            pages: vec![Some(vec![record("8650404457", "Giza", "pyramid")])],
            ..Default::default()
        };

        let (res, body) = get(&app(&fake), "/gallery.js").await;

        assert_eq!(res.status(), tide::http::StatusCode::Ok);
        assert_eq!(
            res.content_type().unwrap().essence(),
            "application/javascript"
        );
        assert!(body.contains(
            r#""source_my_photos":{"display":"My Photos","tags":{"pyramid":"tag_id_1"}}"#
        ));
        assert!(body.contains(r#""id":"8650404457""#));
        assert!(body.contains(r#""sources":{"source_my_photos":1}"#));
        assert_eq!(
            fake.calls(),
            vec![Call::Photoset("72157634011366503".into(), 1)]
        );
    }

    #[async_std::test]
    async fn user_script_decodes_username() {
        let fake = FakeFlickr {
            nsid: Some("44494372@N05".into()),
            pages: vec![Some(vec![])],
            ..Default::default()
        };

        let (res, _) = get(&app(&fake), "/flickr/nasa%20commons/gallery.js").await;

        assert_eq!(res.status(), tide::http::StatusCode::Ok);
        assert_eq!(
            fake.calls(),
            vec![
                Call::FindUser("nasa commons".into()),
                Call::Public("44494372@N05".into(), 1),
            ]
        );
    }

    #[async_std::test]
    async fn unknown_user_gets_empty_payload() {
        let fake = FakeFlickr::default();

        let (res, body) = get(&app(&fake), "/flickr/nobody/gallery.js").await;

        assert_eq!(res.status(), tide::http::StatusCode::Ok);
        assert!(body.contains("State.images = [];"));
        assert!(body.contains(
            r#"State.sources = {"source_my_photos":{"display":"My Photos","tags":{}}};"#
        ));
    }

    #[async_std::test]
    async fn display_pages_reference_their_script() {
        let fake = FakeFlickr::default();
        let app = app(&fake);

        let (res, body) = get(&app, "/").await;
        assert_eq!(res.status(), tide::http::StatusCode::Ok);
        assert!(body.contains("/gallery.js"));
        assert!(!body.contains("/flickr/"));

        let (res, body) = get(&app, "/flickr/legypte/").await;
        assert_eq!(res.status(), tide::http::StatusCode::Ok);
        assert!(body.contains("/flickr/legypte/gallery.js"));

        assert!(fake.calls().is_empty());
    }

    #[async_std::test]
    async fn display_page_escapes_username_in_script_path() {
        let fake = FakeFlickr::default();

        let (res, body) = get(&app(&fake), "/flickr/a%2Fb/").await;

        assert_eq!(res.status(), tide::http::StatusCode::Ok);
        assert!(body.contains("/flickr/a%2Fb/gallery.js"));
        assert!(!body.contains("/flickr/a/b/"));
    }

    #[async_std::test]
    async fn display_page_carries_player_controls() {
        let fake = FakeFlickr::default();

        let (_, body) = get(&app(&fake), "/").await;

        for id in [
            "slide_duration",
            "any_or_all_any",
            "any_or_all_all",
            "include_untagged",
            "source_list",
            "tag_body",
            "select_all",
            "clear_all",
            "full_screen",
            "start_show",
            "no_images_selected",
        ] {
            assert!(body.contains(id), "missing control {}", id);
        }
    }

    #[async_std::test]
    async fn gallery_script_filters_by_tag_settings() {
        let fake = FakeFlickr {
            pages: vec![Some(vec![])],
            ..Default::default()
        };

        let (_, body) = get(&app(&fake), "/gallery.js").await;

        for function in [
            "function tags_are_compatible(",
            "function has_excluded_tag(",
            "function set_all_tags(",
            "function set_source_active(",
            "function full_screen(",
            "sort(case_insensitive_order)",
        ] {
            assert!(body.contains(function), "missing {}", function);
        }
    }

    #[async_std::test]
    async fn default_script_never_resolves_a_username() {
        let fake = FakeFlickr {
            nsid: Some("44494372@N05".into()),
            pages: vec![Some(vec![])],
            ..Default::default()
        };

        let (res, _) = get(&app(&fake), "/gallery.js").await;

        assert_eq!(res.status(), tide::http::StatusCode::Ok);
        assert_eq!(
            fake.calls(),
            vec![Call::Photoset("72157634011366503".into(), 1)]
        );
    }
}
