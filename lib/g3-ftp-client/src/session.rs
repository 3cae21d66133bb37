/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::net::SocketAddrV4;
use std::sync::Arc;

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::control::FtpControlChannel;
use crate::error::{FtpCommandError, FtpConnectError, FtpRawResponseError, FtpSessionError};
use crate::transfer::FtpDataTransfer;
use crate::{
    FtpClientConfig, FtpConnectionProvider, FtpCredentials, FtpPassiveAddressPolicy, FtpTarget,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FtpSessionState {
    Unauthenticated,
    Authenticated,
    PassiveNegotiated,
    Transferring,
    Closed,
}

impl FtpSessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FtpSessionState::Unauthenticated => "unauthenticated",
            FtpSessionState::Authenticated => "authenticated",
            FtpSessionState::PassiveNegotiated => "passive negotiated",
            FtpSessionState::Transferring => "transferring",
            FtpSessionState::Closed => "closed",
        }
    }
}

impl fmt::Display for FtpSessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpRetrieveSummary {
    size: u64,
    data_addr: SocketAddrV4,
}

impl FtpRetrieveSummary {
    /// Bytes received on the data connection.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn data_addr(&self) -> SocketAddrV4 {
        self.data_addr
    }
}

/// A single use FTP session for one file retrieval.
///
/// The operations must be called in order: `connect`, `login`,
/// `enter_passive`, `retrieve`. Calling one in the wrong state fails
/// without sending anything to the server. Any other error closes the
/// session.
pub struct FtpSession<CP, T, E>
where
    CP: FtpConnectionProvider<T, E>,
    T: AsyncRead + AsyncWrite,
    E: Error,
{
    config: Arc<FtpClientConfig>,
    conn_provider: CP,
    control: FtpControlChannel<T>,
    control_peer: SocketAddrV4,
    control_usable: bool,
    state: FtpSessionState,
    data_stream: Option<T>,
    data_addr: Option<SocketAddrV4>,
    _phantom: PhantomData<E>,
}

impl<CP, T, E> FtpSession<CP, T, E>
where
    CP: FtpConnectionProvider<T, E>,
    T: AsyncRead + AsyncWrite + Unpin,
    E: Error,
{
    pub async fn connect(
        target: &FtpTarget,
        mut conn_provider: CP,
        config: &Arc<FtpClientConfig>,
    ) -> Result<Self, FtpSessionError<E>> {
        let ip = conn_provider
            .resolve_host(target.host())
            .await
            .map_err(FtpConnectError::ResolveFailed)?;
        let control_peer = SocketAddrV4::new(ip, target.port());

        debug!("connecting to ftp server {control_peer}");
        let stream = match tokio::time::timeout(
            config.connect_timeout,
            conn_provider.new_control_connection(control_peer),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(FtpConnectError::ControlConnectFailed(e).into()),
            Err(_) => return Err(FtpConnectError::ConnectTimedOut.into()),
        };

        let mut session = FtpSession {
            config: Arc::clone(config),
            conn_provider,
            control: FtpControlChannel::new(stream, config.control.clone()),
            control_peer,
            control_usable: true,
            state: FtpSessionState::Unauthenticated,
            data_stream: None,
            data_addr: None,
            _phantom: PhantomData,
        };

        match tokio::time::timeout(config.greeting_timeout, session.control.wait_greetings()).await
        {
            Ok(Ok(_)) => Ok(session),
            Ok(Err(e)) => Err(session.abort(e)),
            Err(_) => {
                session.close_now();
                Err(FtpConnectError::GreetingTimedOut.into())
            }
        }
    }

    #[inline]
    pub fn state(&self) -> FtpSessionState {
        self.state
    }

    #[inline]
    pub fn control_peer(&self) -> SocketAddrV4 {
        self.control_peer
    }

    fn check_state(
        &self,
        expected: FtpSessionState,
        operation: &'static str,
    ) -> Result<(), FtpSessionError<E>> {
        if self.state == expected {
            Ok(())
        } else {
            Err(FtpSessionError::InvalidState {
                state: self.state,
                operation,
            })
        }
    }

    fn close_now(&mut self) {
        self.data_stream = None;
        self.data_addr = None;
        self.control_usable = false;
        self.state = FtpSessionState::Closed;
    }

    fn abort(&mut self, e: FtpCommandError) -> FtpSessionError<E> {
        let state = self.state;
        self.close_now();
        FtpSessionError::from_command(state, e)
    }

    pub async fn login(&mut self, credentials: &FtpCredentials) -> Result<(), FtpSessionError<E>> {
        self.check_state(FtpSessionState::Unauthenticated, "login")?;

        let r = self.control.send_username(credentials.user()).await;
        r.map_err(|e| self.abort(e))?;

        let r = self.control.send_password(credentials.password()).await;
        r.map_err(|e| self.abort(e))?;

        debug!(
            "logged in to {} as user {}",
            self.control_peer,
            credentials.user()
        );
        self.state = FtpSessionState::Authenticated;
        Ok(())
    }

    fn select_data_addr(&self, reported: SocketAddrV4) -> SocketAddrV4 {
        match self.config.passive_address {
            FtpPassiveAddressPolicy::ServerReported if !reported.ip().is_unspecified() => reported,
            _ => SocketAddrV4::new(*self.control_peer.ip(), reported.port()),
        }
    }

    /// Send PASV and open the data connection, return the connected data address.
    pub async fn enter_passive(&mut self) -> Result<SocketAddrV4, FtpSessionError<E>> {
        self.check_state(FtpSessionState::Authenticated, "enter passive mode")?;

        let r = self.control.request_pasv_addr().await;
        let reported = r.map_err(|e| self.abort(e))?;
        let data_addr = self.select_data_addr(reported);
        debug!("server reported data address {reported}, will connect to {data_addr}");

        let stream = match tokio::time::timeout(
            self.config.connect_timeout,
            self.conn_provider.new_data_connection(data_addr),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                self.close_now();
                return Err(FtpConnectError::DataConnectFailed(e).into());
            }
            Err(_) => {
                self.close_now();
                return Err(FtpConnectError::ConnectTimedOut.into());
            }
        };

        self.data_stream = Some(stream);
        self.data_addr = Some(data_addr);
        self.state = FtpSessionState::PassiveNegotiated;
        Ok(data_addr)
    }

    /// Send RETR and copy all data to the sink until the server closes the
    /// data connection. The session is closed after this call.
    pub async fn retrieve<W>(
        &mut self,
        path: &str,
        sink: &mut W,
    ) -> Result<FtpRetrieveSummary, FtpSessionError<E>>
    where
        W: AsyncWrite + Unpin,
    {
        self.check_state(FtpSessionState::PassiveNegotiated, "retrieve")?;

        let r = self.control.start_retrieve(path).await;
        let code = r.map_err(|e| self.abort(e))?;

        let (Some(data_stream), Some(data_addr)) = (self.data_stream.take(), self.data_addr.take())
        else {
            let state = self.state;
            self.close_now();
            return Err(FtpSessionError::InvalidState {
                state,
                operation: "retrieve",
            });
        };

        debug!("start to retrieve {path} from {data_addr} after reply {code}");
        self.state = FtpSessionState::Transferring;
        let r = FtpDataTransfer::new(data_stream, &self.config.transfer)
            .receive_to_end(sink)
            .await;
        let size = match r {
            Ok(size) => size,
            Err(e) => {
                self.close_now();
                return Err(e.into());
            }
        };

        self.wait_transfer_end().await?;
        self.close_control().await;
        Ok(FtpRetrieveSummary { size, data_addr })
    }

    async fn wait_transfer_end(&mut self) -> Result<(), FtpSessionError<E>> {
        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_retrieve(),
        )
        .await
        {
            Ok(Ok(code)) => {
                debug!("transfer end reply {code} received");
                Ok(())
            }
            Ok(Err(FtpCommandError::RecvFailed(FtpRawResponseError::ConnectionClosed))) => {
                warn!("control connection closed before transfer end reply");
                self.control_usable = false;
                Ok(())
            }
            Ok(Err(e)) => Err(self.abort(e)),
            Err(_) => {
                warn!("timed out to wait transfer end reply");
                // a partial reply may be left in the read buffer
                self.control_usable = false;
                Ok(())
            }
        }
    }

    async fn close_control(&mut self) {
        if self.control_usable {
            if let Err(e) = self.control.send_quit().await {
                debug!("quit failed: {e}");
            }
            if let Err(e) = self.control.shutdown().await {
                debug!("control connection shutdown failed: {e:?}");
            }
        }
        self.close_now();
    }

    /// Send QUIT and close the session without retrieving any file.
    pub async fn quit(&mut self) -> Result<(), FtpSessionError<E>> {
        if self.state == FtpSessionState::Closed || !self.control_usable {
            return Err(FtpSessionError::InvalidState {
                state: self.state,
                operation: "quit",
            });
        }

        let r = self.control.send_quit().await;
        r.map_err(|e| self.abort(e))?;
        if let Err(e) = self.control.shutdown().await {
            debug!("control connection shutdown failed: {e:?}");
        }
        self.close_now();
        Ok(())
    }
}

/// Run a whole session: connect, login, enter passive mode and retrieve
/// `target.url_path()` into the sink.
pub async fn fetch_file<CP, T, E, W>(
    target: &FtpTarget,
    credentials: &FtpCredentials,
    conn_provider: CP,
    config: &Arc<FtpClientConfig>,
    sink: &mut W,
) -> Result<FtpRetrieveSummary, FtpSessionError<E>>
where
    CP: FtpConnectionProvider<T, E>,
    T: AsyncRead + AsyncWrite + Unpin,
    E: Error,
    W: AsyncWrite + Unpin,
{
    let mut session = FtpSession::connect(target, conn_provider, config).await?;
    session.login(credentials).await?;
    session.enter_passive().await?;
    session.retrieve(target.url_path(), sink).await
}
