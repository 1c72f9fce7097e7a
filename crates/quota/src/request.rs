use std::net::IpAddr;

/// The inputs the classifier looks at, borrowed from the inbound request.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRequest<'a> {
    pub(crate) client_name: Option<&'a str>,
    pub(crate) client_type: Option<&'a str>,
    pub(crate) client_ip: IpAddr,
}

impl<'a> ClassificationRequest<'a> {
    /// The caller address is always known; it identifies clients that send no name.
    pub fn new(client_ip: IpAddr) -> Self {
        Self {
            client_name: None,
            client_type: None,
            client_ip,
        }
    }

    pub fn client_name(mut self, client_name: Option<&'a str>) -> Self {
        self.client_name = client_name;
        self
    }

    pub fn client_type(mut self, client_type: Option<&'a str>) -> Self {
        self.client_type = client_type;
        self
    }
}
