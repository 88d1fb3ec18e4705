pub mod config;

pub mod shared {
    pub mod infrastructure {
        pub mod record_store;
    }
}

pub mod modules {
    pub mod rsvps {
        pub mod core {
            pub mod attendance;
            pub mod feed;
            pub mod record;
            pub mod snapshot;
            pub mod validation;
        }
        pub mod use_cases {
            pub mod submit_rsvp {
                pub mod controller;
                pub mod form_view;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod view_message_feed {
                pub mod viewer;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
        }
    }
}

pub mod shell;
