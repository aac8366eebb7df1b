//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Handshake tests driven by a scripted client over an in-memory socket

use blinken_telnetcodec::consts::{self, option};
use blinken_telnetcodec::{NegotiationError, WindowSize, negotiate};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use tokio::task::JoinHandle;
use tracing_test::traced_test;

const DO_SGA: [u8; 3] = [consts::IAC, consts::DO, option::SUPPRESS_GO_AHEAD];
const DO_ECHO: [u8; 3] = [consts::IAC, consts::DO, option::ECHO];

/// Answers each 3 byte server command with the next scripted reply.
fn scripted_client(
    mut client: DuplexStream,
    replies: Vec<Vec<u8>>,
) -> JoinHandle<(DuplexStream, Vec<[u8; 3]>)> {
    tokio::spawn(async move {
        let mut commands = Vec::new();
        for reply in replies {
            let mut command = [0u8; 3];
            client.read_exact(&mut command).await.unwrap();
            commands.push(command);
            client.write_all(&reply).await.unwrap();
        }
        (client, commands)
    })
}

#[tokio::test]
async fn test_full_handshake_returns_client_size() {
    let (mut server, client) = duplex(1024);
    let peer = scripted_client(
        client,
        vec![
            DO_SGA.to_vec(),
            DO_ECHO.to_vec(),
            WindowSize::new(132, 43).to_reply(),
        ],
    );

    let size = negotiate(&mut server).await.unwrap();
    assert_eq!(size, WindowSize::new(132, 43));

    let (_client, commands) = peer.await.unwrap();
    assert_eq!(
        commands,
        vec![
            [consts::IAC, consts::WILL, option::SUPPRESS_GO_AHEAD],
            [consts::IAC, consts::WILL, option::ECHO],
            [consts::IAC, consts::DO, option::NAWS],
        ]
    );
}

#[tokio::test]
async fn test_big_endian_dimensions() {
    let (mut server, client) = duplex(1024);
    let peer = scripted_client(
        client,
        vec![
            DO_SGA.to_vec(),
            DO_ECHO.to_vec(),
            vec![255, 251, 31, 255, 250, 31, 0x01, 0x00, 0x00, 0x30, 255, 240],
        ],
    );

    let size = negotiate(&mut server).await.unwrap();
    assert_eq!(size, WindowSize::new(256, 48));
    peer.await.unwrap();
}

#[tokio::test]
#[traced_test]
async fn test_malformed_window_size_falls_back() {
    let malformed = vec![
        // refused
        vec![consts::IAC, consts::WONT, option::NAWS],
        // truncated
        WindowSize::new(100, 50).to_reply()[..11].to_vec(),
        // wrong terminator
        {
            let mut reply = WindowSize::new(100, 50).to_reply();
            reply[11] = consts::GA;
            reply
        },
        // zero sized
        WindowSize::new(100, 0).to_reply(),
    ];

    for reply in malformed {
        let (mut server, client) = duplex(1024);
        let peer = scripted_client(client, vec![DO_SGA.to_vec(), DO_ECHO.to_vec(), reply]);

        let size = negotiate(&mut server).await.unwrap();
        assert_eq!(size, WindowSize::new(80, 24));
        peer.await.unwrap();
    }

    assert!(logs_contain("Window size negotiation failed"));
}

#[tokio::test]
async fn test_window_size_disconnect_falls_back() {
    let (mut server, client) = duplex(1024);
    let peer = tokio::spawn(async move {
        let mut client = client;
        for reply in [DO_SGA, DO_ECHO] {
            let mut command = [0u8; 3];
            client.read_exact(&mut command).await.unwrap();
            client.write_all(&reply).await.unwrap();
        }
        let mut command = [0u8; 3];
        client.read_exact(&mut command).await.unwrap();
        // hang up instead of answering NAWS
    });

    let size = negotiate(&mut server).await.unwrap();
    assert_eq!(size, WindowSize::default());
    peer.await.unwrap();
}

#[tokio::test]
async fn test_refused_suppress_go_ahead_is_fatal() {
    let (mut server, client) = duplex(1024);
    let peer = scripted_client(
        client,
        vec![vec![consts::IAC, consts::DONT, option::SUPPRESS_GO_AHEAD]],
    );

    let err = negotiate(&mut server).await.unwrap_err();
    match err {
        NegotiationError::UnexpectedResponse { expected, actual } => {
            assert_eq!(expected, DO_SGA.to_vec());
            assert_eq!(actual, vec![consts::IAC, consts::DONT, option::SUPPRESS_GO_AHEAD]);
        }
        other => panic!("unexpected error: {other}"),
    }
    peer.await.unwrap();
}

#[tokio::test]
async fn test_refused_echo_is_fatal() {
    let (mut server, client) = duplex(1024);
    let peer = scripted_client(
        client,
        vec![DO_SGA.to_vec(), vec![consts::IAC, consts::WONT, option::ECHO]],
    );

    let err = negotiate(&mut server).await.unwrap_err();
    assert!(matches!(err, NegotiationError::UnexpectedResponse { .. }));
    peer.await.unwrap();
}

#[tokio::test]
async fn test_disconnect_during_character_mode_is_fatal() {
    let (mut server, client) = duplex(1024);
    drop(client);

    let err = negotiate(&mut server).await.unwrap_err();
    assert!(err.is_io());
}
