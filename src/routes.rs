use axum::{routing::MethodRouter, Router};

/// Wraps a route's handler in one more layer.
pub type Middleware<S> = fn(MethodRouter<S>) -> MethodRouter<S>;

/// One entry of the route table.
pub struct View<S> {
    pub path: String,
    pub handler: MethodRouter<S>,
    pub middlewares: Vec<Middleware<S>>,
}

impl<S> View<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(path: impl Into<String>, handler: MethodRouter<S>) -> Self {
        Self {
            path: path.into(),
            handler,
            middlewares: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with(mut self, middleware: Middleware<S>) -> Self {
        self.middlewares.push(middleware);
        self
    }
}

/// The first middleware in the list ends up outermost.
pub fn chain<S>(handler: MethodRouter<S>, middlewares: &[Middleware<S>]) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    middlewares.iter().rev().fold(handler, |h, m| m(h))
}

pub fn routes<S>(views: Vec<View<S>>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    views.into_iter().fold(Router::new(), |router, view| {
        let handler = chain(view.handler, &view.middlewares);
        router.route(&view.path, handler)
    })
}
