// Login page handler: runs the page state machine for one request
use crate::flow::{LoginPage, PageView};
use crate::lifetime::PageLifetime;
use crate::navigation::RequestNavigator;
use crate::utils::response_builder::ResponseBuilder;
use actix_web::{web, HttpRequest, HttpResponse};
use log::error;

/// Login page
///
/// Redirects to the identity provider or the app root, or renders the
/// sign-in button / error inline.
///
/// The page lifetime is never left on this path: a request has no
/// navigation event of its own. If the visitor disconnects, actix drops
/// this future and with it any in-flight token exchange, so nothing is
/// stored.
pub async fn login_page(req: HttpRequest, page: web::Data<LoginPage>) -> HttpResponse {
    let mut navigator = RequestNavigator::from_query_string(req.query_string());
    // Held open for the whole request
    let (lifetime, _open) = PageLifetime::new();

    let config = page.config();
    let callback_path = config.callback_path();

    match page.enter(&mut navigator, &lifetime).await {
        Ok(PageView::Redirected) => {
            let location = navigator.redirect_target().unwrap_or(&config.root_route);
            ResponseBuilder::redirect(location)
        }
        Ok(PageView::SignIn {
            provider,
            title,
            dark_mode,
        }) => ResponseBuilder::sign_in_page(
            &provider,
            &title,
            dark_mode,
            &callback_path,
            navigator.query_replaced(),
        ),
        Ok(PageView::Unavailable(err)) => ResponseBuilder::error_page(
            &err,
            config.dark_mode,
            &callback_path,
            navigator.query_replaced(),
        ),
        Err(err) => {
            error!("Login failed: {err}");
            ResponseBuilder::error_page(
                &err,
                config.dark_mode,
                &callback_path,
                navigator.query_replaced(),
            )
        }
    }
}
